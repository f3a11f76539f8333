// Mutation Lifecycle
//
// Validated -> Persisted -> ClusterSyncPending -> ClusterSyncOk | ClusterSyncFailed

use crate::domain::error::{DomainError, Result};
use crate::domain::JobId;
use tracing::debug;

/// Which write triggered the cluster refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Create => write!(f, "CREATE"),
            MutationKind::Update => write!(f, "UPDATE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Validated,
    Persisted,
    ClusterSyncPending,
    ClusterSyncOk,
    ClusterSyncFailed,
}

impl MutationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MutationState::ClusterSyncOk | MutationState::ClusterSyncFailed
        )
    }

    fn can_transition_to(&self, next: MutationState) -> bool {
        matches!(
            (self, next),
            (MutationState::Validated, MutationState::Persisted)
                | (MutationState::Persisted, MutationState::ClusterSyncPending)
                | (
                    MutationState::ClusterSyncPending,
                    MutationState::ClusterSyncOk | MutationState::ClusterSyncFailed
                )
        )
    }
}

impl std::fmt::Display for MutationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationState::Validated => write!(f, "VALIDATED"),
            MutationState::Persisted => write!(f, "PERSISTED"),
            MutationState::ClusterSyncPending => write!(f, "CLUSTER_SYNC_PENDING"),
            MutationState::ClusterSyncOk => write!(f, "CLUSTER_SYNC_OK"),
            MutationState::ClusterSyncFailed => write!(f, "CLUSTER_SYNC_FAILED"),
        }
    }
}

/// A single create/update request moving through its lifecycle
#[derive(Debug, Clone)]
pub struct Mutation {
    kind: MutationKind,
    state: MutationState,
    job_id: Option<JobId>,
}

impl Mutation {
    /// Start tracking a mutation whose input already passed validation
    pub fn validated(kind: MutationKind) -> Self {
        Self {
            kind,
            state: MutationState::Validated,
            job_id: None,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn job_id(&self) -> Option<JobId> {
        self.job_id
    }

    /// Validated -> Persisted
    pub fn persisted(&mut self, job_id: JobId) -> Result<()> {
        self.transition(MutationState::Persisted)?;
        self.job_id = Some(job_id);
        Ok(())
    }

    /// Persisted -> ClusterSyncPending
    pub fn sync_pending(&mut self) -> Result<()> {
        self.transition(MutationState::ClusterSyncPending)
    }

    /// ClusterSyncPending -> ClusterSyncOk
    pub fn sync_ok(&mut self) -> Result<()> {
        self.transition(MutationState::ClusterSyncOk)
    }

    /// ClusterSyncPending -> ClusterSyncFailed
    pub fn sync_failed(&mut self) -> Result<()> {
        self.transition(MutationState::ClusterSyncFailed)
    }

    fn transition(&mut self, next: MutationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        debug!(
            kind = %self.kind,
            job_id = ?self.job_id,
            from = %self.state,
            to = %next,
            "Mutation state transition"
        );
        self.state = next;
        Ok(())
    }
}
