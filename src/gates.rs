//! Gate and queue registry.
//!
//! Gates are per-ability locks: a closed gate means the ability's routine
//! will not run until the gate reopens. Queues record an ability request
//! that was blocked and should be retried once the character is grounded.
//!
//! Both sets live in one flat registry owned by the controller so that every
//! mutation goes through the accessors below.

use bevy::prelude::*;

/// Per-ability lock.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Guards the wall-run update.
    WallRun,
    /// Guards the vertical wall-run / ledge probe update.
    VerticalWallRun,
    /// Guards the mantle movement update.
    Mantle,
    /// Guards the "can we start a mantle" check.
    CheckMantle,
    /// Guards the slide update and slide start.
    Slide,
    /// Guards the sprint update and sprint start.
    Sprint,
}

impl Gate {
    /// Gates touched by the bulk open/close operations (jump from rest,
    /// landing, leaving the ground).
    pub const LOCOMOTION: [Gate; 4] = [Gate::WallRun, Gate::VerticalWallRun, Gate::Slide, Gate::Sprint];
}

/// Deferred ability request.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// Start sprinting on the next ground contact.
    Sprint,
    /// Start sliding on the next ground contact.
    Slide,
}

/// Open/closed state of every gate.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSet {
    wall_run: bool,
    vertical_wall_run: bool,
    mantle: bool,
    check_mantle: bool,
    slide: bool,
    sprint: bool,
}

impl Default for GateSet {
    /// Locomotion gates start open. The mantle gates only open from inside
    /// the ledge chain.
    fn default() -> Self {
        Self {
            wall_run: true,
            vertical_wall_run: true,
            mantle: false,
            check_mantle: false,
            slide: true,
            sprint: true,
        }
    }
}

impl GateSet {
    fn slot(&mut self, gate: Gate) -> &mut bool {
        match gate {
            Gate::WallRun => &mut self.wall_run,
            Gate::VerticalWallRun => &mut self.vertical_wall_run,
            Gate::Mantle => &mut self.mantle,
            Gate::CheckMantle => &mut self.check_mantle,
            Gate::Slide => &mut self.slide,
            Gate::Sprint => &mut self.sprint,
        }
    }

    /// Whether the gate is open.
    pub fn is_open(&self, gate: Gate) -> bool {
        match gate {
            Gate::WallRun => self.wall_run,
            Gate::VerticalWallRun => self.vertical_wall_run,
            Gate::Mantle => self.mantle,
            Gate::CheckMantle => self.check_mantle,
            Gate::Slide => self.slide,
            Gate::Sprint => self.sprint,
        }
    }

    /// Open a gate. Opening an open gate is a no-op.
    pub fn open(&mut self, gate: Gate) {
        let slot = self.slot(gate);
        if !*slot {
            trace!("gate {gate:?} opened");
        }
        *slot = true;
    }

    /// Close a gate. Closing a closed gate is a no-op.
    pub fn close(&mut self, gate: Gate) {
        let slot = self.slot(gate);
        if *slot {
            trace!("gate {gate:?} closed");
        }
        *slot = false;
    }

    /// Open all locomotion gates.
    pub fn open_locomotion(&mut self) {
        for gate in Gate::LOCOMOTION {
            self.open(gate);
        }
    }

    /// Close all locomotion gates.
    pub fn close_locomotion(&mut self) {
        for gate in Gate::LOCOMOTION {
            self.close(gate);
        }
    }
}

/// Pending ability requests.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueSet {
    sprint: bool,
    slide: bool,
}

impl QueueSet {
    /// Whether the ability is queued.
    pub fn is_queued(&self, queue: Queue) -> bool {
        match queue {
            Queue::Sprint => self.sprint,
            Queue::Slide => self.slide,
        }
    }

    /// Queue an ability.
    pub fn arm(&mut self, queue: Queue) {
        trace!("queue {queue:?} armed");
        match queue {
            Queue::Sprint => self.sprint = true,
            Queue::Slide => self.slide = true,
        }
    }

    /// Drop every pending request.
    pub fn clear(&mut self) {
        self.sprint = false;
        self.slide = false;
    }

    /// The request to honour on landing. Slide wins over sprint.
    pub fn next(&self) -> Option<Queue> {
        if self.slide {
            Some(Queue::Slide)
        } else if self.sprint {
            Some(Queue::Sprint)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gates() {
        let gates = GateSet::default();
        for gate in Gate::LOCOMOTION {
            assert!(gates.is_open(gate), "{gate:?} should start open");
        }
        assert!(!gates.is_open(Gate::Mantle));
        assert!(!gates.is_open(Gate::CheckMantle));
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut gates = GateSet::default();
        gates.close(Gate::WallRun);
        gates.close(Gate::WallRun);
        assert!(!gates.is_open(Gate::WallRun));

        gates.open(Gate::WallRun);
        gates.open(Gate::WallRun);
        assert!(gates.is_open(Gate::WallRun));
    }

    #[test]
    fn bulk_operations_leave_mantle_gates_alone() {
        let mut gates = GateSet::default();
        gates.open(Gate::CheckMantle);

        gates.close_locomotion();
        for gate in Gate::LOCOMOTION {
            assert!(!gates.is_open(gate));
        }
        assert!(gates.is_open(Gate::CheckMantle));

        gates.open_locomotion();
        for gate in Gate::LOCOMOTION {
            assert!(gates.is_open(gate));
        }
        assert!(!gates.is_open(Gate::Mantle));
    }

    #[test]
    fn slide_queue_has_priority() {
        let mut queues = QueueSet::default();
        assert_eq!(queues.next(), None);

        queues.arm(Queue::Sprint);
        assert_eq!(queues.next(), Some(Queue::Sprint));

        queues.arm(Queue::Slide);
        assert_eq!(queues.next(), Some(Queue::Slide));

        queues.clear();
        assert!(!queues.is_queued(Queue::Sprint));
        assert!(!queues.is_queued(Queue::Slide));
    }
}
