use crate::ir::types::{in_bounds, IrPulse};

pub const DEFAULT_TOLERANCE: f64 = 0.35;

/// Sequential view of a captured signal. An expectation that does not match
/// leaves the position untouched so the caller can try an alternative.
pub trait IrReceive {
    fn expect_item(&mut self, mark: IrPulse, space: IrPulse) -> bool;
    fn expect_mark(&mut self, mark: IrPulse) -> bool;
}

#[derive(Debug, Clone)]
pub struct IrSequenceReader<'a> {
    pulses: &'a [IrPulse],
    index: usize,
    tolerance: f64,
}

impl<'a> IrSequenceReader<'a> {
    pub fn new<T: AsRef<[IrPulse]> + ?Sized>(pulses: &'a T) -> Self {
        Self::with_tolerance(pulses, DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance<T: AsRef<[IrPulse]> + ?Sized>(pulses: &'a T, tolerance: f64) -> Self {
        IrSequenceReader {
            pulses: pulses.as_ref(),
            index: 0,
            tolerance,
        }
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> &'a [IrPulse] {
        &self.pulses[self.index..]
    }

    fn matches(&self, offset: usize, target: IrPulse) -> bool {
        self.pulses
            .get(self.index + offset)
            .map_or(false, |pulse| in_bounds(*pulse, target, self.tolerance))
    }
}

impl IrReceive for IrSequenceReader<'_> {
    fn expect_item(&mut self, mark: IrPulse, space: IrPulse) -> bool {
        if self.matches(0, mark) && self.matches(1, space) {
            self.index += 2;
            true
        } else {
            false
        }
    }

    fn expect_mark(&mut self, mark: IrPulse) -> bool {
        if self.matches(0, mark) {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::types::IrSequence;

    fn sequence(pulses: &[u128]) -> IrSequence {
        IrSequence(pulses.iter().copied().map(IrPulse).collect())
    }

    #[test]
    fn failed_expectation_does_not_advance() {
        let seq = sequence(&[625, 1935, 625]);
        let mut reader = IrSequenceReader::new(&seq);
        assert!(!reader.expect_item(IrPulse(625), IrPulse(685)));
        assert_eq!(reader.position(), 0);
        assert!(reader.expect_item(IrPulse(625), IrPulse(1935)));
        assert_eq!(reader.position(), 2);
        assert!(reader.expect_mark(IrPulse(625)));
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn running_out_is_a_mismatch() {
        let seq = sequence(&[625]);
        let mut reader = IrSequenceReader::new(&seq);
        assert!(!reader.expect_item(IrPulse(625), IrPulse(685)));
        assert!(reader.expect_mark(IrPulse(625)));
        assert!(!reader.expect_mark(IrPulse(625)));
    }

    #[test]
    fn tolerance_is_configurable() {
        let seq = sequence(&[700]);
        assert!(IrSequenceReader::new(&seq).expect_mark(IrPulse(625)));
        assert!(!IrSequenceReader::with_tolerance(&seq, 0.05).expect_mark(IrPulse(625)));
    }
}
