//! Frame alignment search
//!
//! The engine itself never checks whether framing is correct; that
//! judgement belongs to the control-domain collaborator watching the
//! data peek registers. [`FrameAligner`] is that collaborator's search
//! loop: observe the framing lane, request one rotation if the training
//! pattern is not visible, and give up after a full cycle of rotations.
//! Rotation is cyclic with period S, so S failed attempts mean no
//! framing exists and the lane is unusable, a fatal condition for the
//! consuming system.

use crate::telemetry::ControlPort;

/// Outcome of one alignment poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignStatus {
    /// Training pattern visible at the expected position
    Aligned {
        /// Rotations issued to get here
        slips: u8,
    },
    /// Not yet aligned; a rotation may have been requested
    Searching,
    /// All S rotations tried without finding the pattern
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlignStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Aligned { slips } => defmt::write!(f, "ALIGNED({} slips)", slips),
            Self::Searching => defmt::write!(f, "SEARCHING"),
            Self::Failed => defmt::write!(f, "FAILED"),
        }
    }
}

/// Step-wise bit-slip search for the training pattern
///
/// Drive from the control-domain task: refresh the port, call
/// [`FrameAligner::poll`], give the engine time to apply the rotation,
/// repeat. The aligner never blocks and issues at most one in-flight
/// rotation request.
#[derive(Clone, Copy, Debug)]
pub struct FrameAligner {
    lane: usize,
    pattern: u16,
    width: u8,
    slips_issued: u8,
    outcome: Option<AlignStatus>,
}

impl FrameAligner {
    /// Create a search for `pattern` on the given framing lane
    #[must_use]
    pub const fn new(lane: usize, pattern: u16, width: u8) -> Self {
        Self {
            lane,
            pattern,
            width,
            slips_issued: 0,
            outcome: None,
        }
    }

    /// Rotations requested so far
    #[must_use]
    pub const fn slips_issued(&self) -> u8 {
        self.slips_issued
    }

    /// Run one search step against settled port state
    ///
    /// Once `Aligned` or `Failed` is returned the aligner latches that
    /// outcome; call [`FrameAligner::restart`] to search again.
    pub fn poll(&mut self, port: &ControlPort<'_>) -> AlignStatus {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let Some(word) = port.data_peek(self.lane) else {
            self.outcome = Some(AlignStatus::Failed);
            return AlignStatus::Failed;
        };
        if word == self.pattern {
            let aligned = AlignStatus::Aligned {
                slips: self.slips_issued,
            };
            self.outcome = Some(aligned);
            return aligned;
        }
        if self.slips_issued >= self.width {
            self.outcome = Some(AlignStatus::Failed);
            return AlignStatus::Failed;
        }
        if port.trigger_bitslip() {
            self.slips_issued += 1;
        }
        // A rejected trigger means the previous rotation is still in
        // flight; try again on the next poll.
        AlignStatus::Searching
    }

    /// Forget any latched outcome and search from scratch
    pub fn restart(&mut self) {
        self.slips_issued = 0;
        self.outcome = None;
    }
}
