use std::{
    collections::{BTreeSet, HashMap},
    time::Instant,
};

use log::{debug, info};

use sceneshift_shared::{EndpointId, SwitchId};

/// Acknowledgement state of one switch attempt. An endpoint only ever moves
/// out of `pending`, never back into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchProgress {
    pending: BTreeSet<EndpointId>,
    done: BTreeSet<EndpointId>,
    timed_out: BTreeSet<EndpointId>,
    deadline: Option<Instant>,
}

impl SwitchProgress {
    fn new(pending: BTreeSet<EndpointId>) -> Self {
        Self {
            pending,
            done: BTreeSet::new(),
            timed_out: BTreeSet::new(),
            deadline: None,
        }
    }

    /// Endpoints still expected to acknowledge
    pub fn pending(&self) -> &BTreeSet<EndpointId> {
        &self.pending
    }

    /// Endpoints that acknowledged
    pub fn done(&self) -> &BTreeSet<EndpointId> {
        &self.done
    }

    /// Endpoints dropped from `pending` when the deadline passed
    pub fn timed_out(&self) -> &BTreeSet<EndpointId> {
        &self.timed_out
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Every live switch attempt, keyed by [`SwitchId`]
#[derive(Default)]
pub struct SwitchTracker {
    attempts: HashMap<SwitchId, SwitchProgress>,
}

impl SwitchTracker {
    pub fn new() -> Self {
        Self {
            attempts: HashMap::new(),
        }
    }

    /// Starts tracking a new attempt that waits on `endpoints`
    pub fn begin<I: IntoIterator<Item = EndpointId>>(&mut self, endpoints: I) -> SwitchId {
        let switch_id = SwitchId::generate(&self.attempts);
        let progress = SwitchProgress::new(endpoints.into_iter().collect());
        debug!(
            "switch {} waits on {} endpoints",
            switch_id,
            progress.pending.len()
        );
        self.attempts.insert(switch_id, progress);
        switch_id
    }

    /// Moves `endpoint` from pending to done. Returns `false`, changing
    /// nothing, if the attempt is unknown or the endpoint is not pending.
    pub fn mark_done(&mut self, switch_id: &SwitchId, endpoint: &EndpointId) -> bool {
        let Some(progress) = self.attempts.get_mut(switch_id) else {
            return false;
        };
        if !progress.pending.remove(endpoint) {
            return false;
        }
        progress.done.insert(*endpoint);
        true
    }

    /// Forgets `endpoint` in every live attempt
    pub fn remove_endpoint(&mut self, endpoint: &EndpointId) {
        for progress in self.attempts.values_mut() {
            progress.pending.remove(endpoint);
            progress.done.remove(endpoint);
        }
    }

    /// `false` for unknown attempts
    pub fn is_complete(&self, switch_id: &SwitchId) -> bool {
        self.attempts
            .get(switch_id)
            .map_or(false, SwitchProgress::is_complete)
    }

    pub fn set_deadline(&mut self, switch_id: &SwitchId, deadline: Instant) {
        if let Some(progress) = self.attempts.get_mut(switch_id) {
            progress.deadline = Some(deadline);
        }
    }

    /// Drops every still-pending endpoint of attempts whose deadline is at or
    /// before `now`. Returns the attempts that lost endpoints this way.
    pub fn expire(&mut self, now: &Instant) -> Vec<SwitchId> {
        let mut expired = Vec::new();
        for (switch_id, progress) in self.attempts.iter_mut() {
            let Some(deadline) = progress.deadline else {
                continue;
            };
            if deadline > *now || progress.pending.is_empty() {
                continue;
            }
            info!(
                "switch {} timed out waiting on {} endpoints",
                switch_id,
                progress.pending.len()
            );
            let pending = std::mem::take(&mut progress.pending);
            progress.timed_out.extend(pending);
            expired.push(*switch_id);
        }
        expired
    }

    pub fn get(&self, switch_id: &SwitchId) -> Option<&SwitchProgress> {
        self.attempts.get(switch_id)
    }

    /// Stops tracking the attempt and hands back its final state
    pub fn finish(&mut self, switch_id: &SwitchId) -> Option<SwitchProgress> {
        self.attempts.remove(switch_id)
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
