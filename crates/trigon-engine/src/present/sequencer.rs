use anyhow::Result;

use super::backend::{CommandRecorder, ExecutionContext, PresentationChain};

struct RecordingSlot<R> {
    recorder: R,
    recording: bool,
}

/// Owns one recording slot per frame in flight.
///
/// Slots are allocated once and survive chain rebuilds; only their contents are
/// overwritten each cycle. Begin/end calls on a slot must alternate strictly.
pub struct CommandSequencer<R> {
    slots: Vec<RecordingSlot<R>>,
}

impl<R: CommandRecorder> CommandSequencer<R> {
    /// Allocates `count` slots from the execution context.
    pub fn allocate<C>(context: &mut C, count: usize) -> Result<Self>
    where
        C: ExecutionContext,
        C::Chain: PresentationChain<Recording = R>,
    {
        let recorders = context.allocate_recordings(count)?;
        anyhow::ensure!(
            recorders.len() == count,
            "execution context allocated {} recording slots, expected {count}",
            recorders.len()
        );

        let slots = recorders
            .into_iter()
            .map(|recorder| RecordingSlot {
                recorder,
                recording: false,
            })
            .collect();

        Ok(Self { slots })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` while slot `index` has an open recording.
    pub fn is_recording(&self, index: usize) -> bool {
        self.slots[index].recording
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut R {
        &mut self.slots[index].recorder
    }

    /// Opens a recording on slot `index`.
    ///
    /// # Panics
    /// Panics if the slot already has an open recording.
    pub fn begin_recording(&mut self, index: usize) -> Result<()> {
        let slot = &mut self.slots[index];
        assert!(
            !slot.recording,
            "begin_recording called twice on slot {index} without end_recording"
        );
        slot.recorder.begin_recording()?;
        slot.recording = true;
        Ok(())
    }

    /// Closes the recording on slot `index`.
    ///
    /// # Panics
    /// Panics if the slot has no open recording.
    pub fn end_recording(&mut self, index: usize) -> Result<()> {
        let slot = &mut self.slots[index];
        assert!(
            slot.recording,
            "end_recording called on slot {index} without an open recording"
        );
        slot.recording = false;
        slot.recorder.end_recording()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::mock::{Event, MockContext, MockRecorder, Probe};

    fn sequencer(count: usize) -> (CommandSequencer<MockRecorder>, Probe) {
        let (mut ctx, probe) = MockContext::new();
        let seq = CommandSequencer::allocate(&mut ctx, count).unwrap();
        (seq, probe)
    }

    #[test]
    fn allocates_requested_slots() {
        let (seq, probe) = sequencer(2);
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_recording(0));
        assert!(!seq.is_recording(1));
        assert_eq!(probe.events(), vec![Event::AllocateRecordings(2)]);
    }

    #[test]
    fn short_allocation_is_an_error() {
        let (mut ctx, probe) = MockContext::new();
        probe.withhold_slots(1);

        let err = CommandSequencer::<MockRecorder>::allocate(&mut ctx, 2)
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "execution context allocated 1 recording slots, expected 2"
        );
    }

    #[test]
    fn begin_end_alternate_per_slot() {
        let (mut seq, probe) = sequencer(2);
        seq.begin_recording(1).unwrap();
        assert!(seq.is_recording(1));
        assert!(!seq.is_recording(0));
        seq.end_recording(1).unwrap();
        seq.begin_recording(1).unwrap();

        assert_eq!(
            &probe.events()[1..],
            &[Event::BeginRecording(1), Event::EndRecording(1), Event::BeginRecording(1)]
        );
    }

    #[test]
    #[should_panic(expected = "begin_recording called twice")]
    fn double_begin_panics() {
        let (mut seq, _probe) = sequencer(2);
        seq.begin_recording(0).unwrap();
        let _ = seq.begin_recording(0);
    }

    #[test]
    #[should_panic(expected = "without an open recording")]
    fn end_without_begin_panics() {
        let (mut seq, _probe) = sequencer(2);
        let _ = seq.end_recording(0);
    }
}
