use std::str::FromStr;

use serde::Deserialize;

/// Behaviour when a style source changes while a compile is already running.
///
/// - `Queue`: remember that another compile is needed and start exactly one
///   more when the current one finishes, however many changes arrived
///   (default).
/// - `Ignore`: drop changes that arrive mid-compile; only changes seen while
///   idle start a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Ignore,
}

impl FromStr for TriggerWhileRunningBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(TriggerWhileRunningBehaviour::Queue),
            "ignore" => Ok(TriggerWhileRunningBehaviour::Ignore),
            other => Err(format!(
                "invalid triggered_while_running_behaviour: {other} (expected \"queue\" or \"ignore\")"
            )),
        }
    }
}

/// What a pipeline does when one input fails to transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The first failing input ends the run with that error.
    Abort,
    /// Failing inputs are logged and recorded; the remaining inputs still run.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaviour_parses_case_insensitively() {
        assert_eq!(
            " Queue ".parse::<TriggerWhileRunningBehaviour>(),
            Ok(TriggerWhileRunningBehaviour::Queue)
        );
        assert_eq!(
            "IGNORE".parse::<TriggerWhileRunningBehaviour>(),
            Ok(TriggerWhileRunningBehaviour::Ignore)
        );
        assert!("cancel".parse::<TriggerWhileRunningBehaviour>().is_err());
    }
}
