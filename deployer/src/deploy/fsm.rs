//! Finite state machine for one reconcile run

use crate::errors::Stage;

/// Reconcile state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    /// Nothing has been sent to the platform yet
    Start,

    /// Looking for an active deployment of the branch
    LookupDeployment,

    /// Looking for the API URL environment variable
    LookupEnvVar,

    /// Creating or editing the API URL environment variable
    UpsertEnvVar,

    /// Upsert finished, no deployment triggered yet
    EnvVarSettled,

    /// Re-triggering the matched deployment
    Redeploying,

    /// Building a fresh deployment from the branch
    Creating,

    /// A deployment was triggered
    Done,

    /// A fatal failure stopped the run
    Halted,
}

impl ReconcileState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReconcileState::Done | ReconcileState::Halted)
    }
}

/// Reconcile event
#[derive(Debug, Clone)]
pub enum ReconcileEvent {
    Begin,
    DeploymentLookedUp,
    EnvVarLookedUp,

    /// Upsert finished, successfully or not
    EnvVarSettled,

    Redeploy,

    /// Build from source, either directly or after a failed redeploy
    Create,

    Deployed,
    Fail(Stage, String),
}

/// Reconcile FSM
#[derive(Debug, Clone)]
pub struct ReconcileFsm {
    state: ReconcileState,
    failure: Option<(Stage, String)>,
    fell_back: bool,
}

impl ReconcileFsm {
    pub fn new() -> Self {
        Self {
            state: ReconcileState::Start,
            failure: None,
            fell_back: false,
        }
    }

    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// Stage and message of the failure that halted the run
    pub fn failure(&self) -> Option<(Stage, &str)> {
        self.failure
            .as_ref()
            .map(|(stage, message)| (*stage, message.as_str()))
    }

    /// Whether a failed redeploy fell back to creating a deployment
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    /// Process an event and transition state. No path re-enters an earlier step.
    pub fn process(&mut self, event: ReconcileEvent) -> Result<ReconcileState, String> {
        use ReconcileEvent as E;
        use ReconcileState as S;

        let next = match (self.state, &event) {
            (S::Start, E::Begin) => S::LookupDeployment,
            (S::LookupDeployment, E::DeploymentLookedUp) => S::LookupEnvVar,
            (S::LookupEnvVar, E::EnvVarLookedUp) => S::UpsertEnvVar,
            (S::UpsertEnvVar, E::EnvVarSettled) => S::EnvVarSettled,
            (S::EnvVarSettled, E::Redeploy) => S::Redeploying,
            (S::EnvVarSettled, E::Create) => S::Creating,
            (S::Redeploying, E::Create) => {
                self.fell_back = true;
                S::Creating
            }
            (S::Redeploying | S::Creating, E::Deployed) => S::Done,
            (state, E::Fail(stage, message)) if !state.is_terminal() => {
                self.failure = Some((*stage, message.clone()));
                S::Halted
            }
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = next;
        Ok(next)
    }
}

impl Default for ReconcileFsm {
    fn default() -> Self {
        Self::new()
    }
}
