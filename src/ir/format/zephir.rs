use crate::ir::receive::IrReceive;
use crate::ir::types::{IrDecodeError, IrFormat, IrPulseBytes, IrPulseTrain, IrTimings};

pub const ZEPHIR_TIMINGS: IrTimings = IrTimings {
    header_mark: 8960,
    header_space: 4485,
    bit_mark: 625,
    zero_space: 685,
    one_space: 1935,
    footer_mark: 625,
    footer_space: 0,
};

/// Pulse distance encoding used by Zephir remotes: a long header, each byte
/// least significant bit first, then a lone footer mark.
pub struct ZephirFormat {}

impl IrFormat for ZephirFormat {
    const FRAME_LENGTH: usize = 13;
    const TIMINGS: IrTimings = ZEPHIR_TIMINGS;

    fn encode<T: AsRef<[u8]>>(bytes: T) -> IrPulseTrain {
        let bytes = bytes.as_ref();
        let mut symbols = Vec::with_capacity(bytes.len() * 8 + 2);

        // leader
        symbols.push(Self::TIMINGS.header());

        // data
        for byte in bytes {
            let mut bits = *byte;
            for _ in 0..8 {
                symbols.push(Self::TIMINGS.bit((bits & 1) == 1));
                bits >>= 1;
            }
        }

        // stop bit
        symbols.push(Self::TIMINGS.footer());

        IrPulseTrain {
            carrier_frequency: Self::CARRIER_FREQUENCY,
            symbols,
        }
    }

    fn decode<R: IrReceive>(receiver: &mut R) -> Result<IrPulseBytes, IrDecodeError> {
        let header = Self::TIMINGS.header();
        if !receiver.expect_item(header.mark, header.space) {
            debug!("header fail");
            return Err(IrDecodeError::HeaderMismatch);
        }

        let one = Self::TIMINGS.bit(true);
        let zero = Self::TIMINGS.bit(false);
        let mut bytes = vec![0u8; Self::FRAME_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            for j in 0..8 {
                if receiver.expect_item(one.mark, one.space) {
                    *byte |= 1 << j;
                } else if !receiver.expect_item(zero.mark, zero.space) {
                    debug!("byte {} bit {} fail", i, j);
                    return Err(IrDecodeError::BitMismatch { byte: i, bit: j });
                }
            }
            trace!("byte {} {:02X}", i, byte);
        }

        if !receiver.expect_mark(Self::TIMINGS.footer().mark) {
            debug!("footer fail");
            return Err(IrDecodeError::FooterMismatch);
        }

        Ok(IrPulseBytes(bytes))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::receive::IrSequenceReader;
    use crate::ir::types::{IrPulse, IrSequence, IrSymbol};

    const BYTES: [u8; 13] = [
        0xC3, 0x87, 0x20, 0x12, 0xA0, 0x00, 0x20, 0x00, 0x00, 0x20, 0x20, 0x05, 0x81,
    ];

    #[test]
    fn encodes_header_bits_and_footer() {
        let train = ZephirFormat::encode(BYTES);
        assert_eq!(train.carrier_frequency, 38000);
        assert_eq!(train.len(), 1 + 13 * 8 + 1);
        assert_eq!(train.symbols[0], IrSymbol::new(8960, 4485));
        assert_eq!(train.symbols[105], IrSymbol::new(625, 0));
        assert!(train.symbols[1..105].iter().all(|s| s.mark == IrPulse(625)));
    }

    #[test]
    fn bits_go_out_least_significant_first() {
        let train = ZephirFormat::encode([0xC3u8]);
        let spaces: Vec<u128> = train.symbols[1..9].iter().map(|s| s.space.0).collect();
        assert_eq!(spaces, vec![1935, 1935, 685, 685, 685, 685, 1935, 1935]);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let seq = ZephirFormat::encode(BYTES).to_sequence();
        assert_eq!(seq.0.len(), 211);
        let mut reader = IrSequenceReader::new(&seq);
        assert_eq!(
            ZephirFormat::decode(&mut reader).unwrap(),
            IrPulseBytes(BYTES.to_vec())
        );
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn decodes_jittered_capture() {
        let seq = ZephirFormat::encode(BYTES).to_sequence();
        let jittered = IrSequence(
            seq.0
                .iter()
                .enumerate()
                .map(|(i, p)| IrPulse(if i % 2 == 0 { p.0 + 60 } else { p.0 - 50 }))
                .collect(),
        );
        let mut reader = IrSequenceReader::new(&jittered);
        assert_eq!(
            ZephirFormat::decode(&mut reader).unwrap(),
            IrPulseBytes(BYTES.to_vec())
        );
    }

    #[test]
    fn rejects_missing_header() {
        let mut seq = ZephirFormat::encode(BYTES).to_sequence();
        seq.0[0] = IrPulse(3000);
        assert_eq!(
            ZephirFormat::decode(&mut IrSequenceReader::new(&seq)),
            Err(IrDecodeError::HeaderMismatch)
        );
    }

    #[test]
    fn rejects_empty_sequence() {
        let seq = IrSequence(Vec::new());
        assert_eq!(
            ZephirFormat::decode(&mut IrSequenceReader::new(&seq)),
            Err(IrDecodeError::HeaderMismatch)
        );
    }

    #[test]
    fn reports_exact_bit_position() {
        let seq = ZephirFormat::encode(BYTES).to_sequence();
        for byte in 0..ZephirFormat::FRAME_LENGTH {
            for bit in 0..8 {
                let mark = 2 + 2 * (byte * 8 + bit);
                // unknown space, then unknown mark
                for (index, pulse) in [(mark + 1, 1200), (mark, 2000)] {
                    let mut corrupt = seq.clone();
                    corrupt.0[index] = IrPulse(pulse);
                    assert_eq!(
                        ZephirFormat::decode(&mut IrSequenceReader::new(&corrupt)),
                        Err(IrDecodeError::BitMismatch { byte, bit })
                    );
                }
            }
        }
    }

    #[test]
    fn rejects_truncated_sequence() {
        let mut seq = ZephirFormat::encode(BYTES).to_sequence();
        seq.0.truncate(100);
        assert_eq!(
            ZephirFormat::decode(&mut IrSequenceReader::new(&seq)),
            Err(IrDecodeError::BitMismatch { byte: 6, bit: 1 })
        );
    }

    #[test]
    fn rejects_missing_footer() {
        let mut seq = ZephirFormat::encode(BYTES).to_sequence();
        seq.0.pop();
        assert_eq!(
            ZephirFormat::decode(&mut IrSequenceReader::new(&seq)),
            Err(IrDecodeError::FooterMismatch)
        );
    }
}
