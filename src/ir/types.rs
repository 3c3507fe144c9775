use itertools::Itertools;
use num_traits::AsPrimitive;
use std::convert::TryFrom;
use std::fmt::{self, Display};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

use crate::ir::receive::IrReceive;

/// Duration of a single mark or space, in microseconds.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrPulse(pub u128);

impl IrPulse {
    pub fn into_inner(self) -> u128 {
        self.0
    }
}

impl AsPrimitive<f64> for IrPulse {
    fn as_(self) -> f64 {
        self.0.as_()
    }
}

/// Raw alternating mark/space durations, starting with a mark.
#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct IrSequence(pub Vec<IrPulse>);

impl IrSequence {
    pub fn into_inner(self) -> Vec<IrPulse> {
        self.0
    }

    pub fn as_hex(&self) -> String {
        self.0.iter().map(|p| format!("{:X}", p.0)).join(" ")
    }
}

impl AsRef<[IrPulse]> for IrSequence {
    fn as_ref(&self) -> &[IrPulse] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IrSymbol {
    pub mark: IrPulse,
    pub space: IrPulse,
}

impl IrSymbol {
    pub const fn new(mark: u128, space: u128) -> Self {
        IrSymbol {
            mark: IrPulse(mark),
            space: IrPulse(space),
        }
    }
}

/// Symbols to be modulated onto a single carrier frequency.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct IrPulseTrain {
    pub carrier_frequency: u32,
    pub symbols: Vec<IrSymbol>,
}

impl IrPulseTrain {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Flattens into alternating durations. A zero space marks the end of
    /// transmission and is not emitted.
    pub fn to_sequence(&self) -> IrSequence {
        IrSequence(
            self.symbols
                .iter()
                .flat_map(|s| [s.mark, s.space])
                .filter(|p| p.0 != 0)
                .collect(),
        )
    }
}

/// Nominal durations of every symbol a pulse distance format emits.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IrTimings {
    pub header_mark: u128,
    pub header_space: u128,
    pub bit_mark: u128,
    pub zero_space: u128,
    pub one_space: u128,
    pub footer_mark: u128,
    pub footer_space: u128,
}

impl IrTimings {
    pub const fn header(&self) -> IrSymbol {
        IrSymbol::new(self.header_mark, self.header_space)
    }

    pub const fn bit(&self, set: bool) -> IrSymbol {
        IrSymbol::new(
            self.bit_mark,
            if set { self.one_space } else { self.zero_space },
        )
    }

    pub const fn footer(&self) -> IrSymbol {
        IrSymbol::new(self.footer_mark, self.footer_space)
    }
}

pub trait IrFormat {
    const CARRIER_FREQUENCY: u32 = 38000;
    const FRAME_LENGTH: usize;
    const TIMINGS: IrTimings;
    fn encode<T: AsRef<[u8]>>(bytes: T) -> IrPulseTrain;
    fn decode<R: IrReceive>(receiver: &mut R) -> Result<IrPulseBytes, IrDecodeError>;
}

// target

pub trait TemperatureCode: TryFrom<u32> + Into<u32> + Copy {}

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, EnumIter, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum ACMode {
    #[strum(to_string = "auto", serialize = "heat_cool")]
    Auto,
    #[strum(to_string = "cool")]
    Cool,
    #[strum(to_string = "heat", serialize = "warm")]
    Heat,
    #[strum(to_string = "dry")]
    Dry,
    #[strum(to_string = "fan_only", serialize = "fan")]
    FanOnly,
    #[strum(to_string = "off")]
    Off,
}

impl Default for ACMode {
    fn default() -> Self {
        ACMode::Auto
    }
}

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, EnumIter, EnumString, StrumDisplay,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
}

impl Default for FanSpeed {
    fn default() -> Self {
        FanSpeed::Auto
    }
}

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, EnumIter, EnumString, StrumDisplay,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SwingMode {
    Off,
    Vertical,
}

impl Default for SwingMode {
    fn default() -> Self {
        SwingMode::Off
    }
}

/// Snapshot of everything a remote transmits in one command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IrStatus<T> {
    pub powered: bool,
    pub mode: ACMode,
    pub fan: FanSpeed,
    pub swing: SwingMode,
    pub temperature: T,
}

impl<T: Default> Default for IrStatus<T> {
    fn default() -> Self {
        IrStatus {
            powered: false,
            mode: ACMode::Off,
            fan: FanSpeed::default(),
            swing: SwingMode::default(),
            temperature: T::default(),
        }
    }
}

impl<T: TemperatureCode> Display for IrStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mode={} temperature={} fan={} swing={}",
            if self.powered { "on" } else { "off" },
            self.mode,
            Into::<u32>::into(self.temperature),
            self.fan,
            self.swing
        )
    }
}

pub trait IrTarget {
    type Format: IrFormat;
    type Error: std::error::Error + Send + Sync;
    type Temperature: TemperatureCode + Send + Sync;
    const SEQ_LENGTH: usize;
    fn power_off(&mut self) -> Result<IrPulseTrain, Self::Error>;
    fn power_on(&mut self) -> Result<IrPulseTrain, Self::Error>;
    fn temp_up(&mut self) -> Result<IrPulseTrain, Self::Error>;
    fn temp_down(&mut self) -> Result<IrPulseTrain, Self::Error>;
    fn temp_set(&mut self, temp: Self::Temperature) -> Result<IrPulseTrain, Self::Error>;
    fn mode_set(&mut self, mode: ACMode) -> Result<IrPulseTrain, Self::Error>;
    fn fan_set(&mut self, fan: FanSpeed) -> Result<IrPulseTrain, Self::Error>;
    fn swing_set(&mut self, swing: SwingMode) -> Result<IrPulseTrain, Self::Error>;
    fn status(&self) -> IrStatus<Self::Temperature>;
    /// Decodes one message and adopts it only if every check passed.
    fn receive<R: IrReceive>(
        &mut self,
        receiver: &mut R,
    ) -> Result<IrStatus<Self::Temperature>, Self::Error>;
}

// source

pub(crate) fn in_bounds<L: AsPrimitive<f64>, T: AsPrimitive<f64>>(
    length: L,
    target: T,
    tolerance: f64,
) -> bool {
    length.as_() > target.as_() * (1f64 - tolerance)
        && length.as_() < target.as_() * (1f64 + tolerance)
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum IrDecodeError {
    #[error("Sequence did not start with a header")]
    HeaderMismatch,
    #[error("Unknown bit at byte {byte} bit {bit}")]
    BitMismatch { byte: usize, bit: usize },
    #[error("Sequence did not end with a footer")]
    FooterMismatch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IrPulseBytes(pub Vec<u8>);

impl AsRef<[u8]> for IrPulseBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for IrPulseBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|b| format!("0x{:02X}", b)).join(", "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_bounds_is_exclusive() {
        assert!(in_bounds(IrPulse(625), 625u128, 0.35));
        assert!(in_bounds(IrPulse(800), 625u128, 0.35));
        assert!(!in_bounds(IrPulse(1200), 685u128, 0.35));
        assert!(!in_bounds(IrPulse(1200), 1935u128, 0.35));
        assert!(!in_bounds(IrPulse(0), 0u128, 0.35));
    }

    #[test]
    fn to_sequence_drops_terminating_space() {
        let train = IrPulseTrain {
            carrier_frequency: 38000,
            symbols: vec![IrSymbol::new(900, 450), IrSymbol::new(60, 0)],
        };
        assert_eq!(
            train.to_sequence(),
            IrSequence(vec![IrPulse(900), IrPulse(450), IrPulse(60)])
        );
    }

    #[test]
    fn modes_parse_aliases() {
        assert_eq!("heat_cool".parse::<ACMode>().unwrap(), ACMode::Auto);
        assert_eq!("Fan".parse::<ACMode>().unwrap(), ACMode::FanOnly);
        assert_eq!(ACMode::FanOnly.to_string(), "fan_only");
        assert_eq!("HIGH".parse::<FanSpeed>().unwrap(), FanSpeed::High);
        assert_eq!(SwingMode::Vertical.to_string(), "vertical");
        assert!("sideways".parse::<SwingMode>().is_err());
    }

    #[test]
    fn pulse_bytes_display_as_hex() {
        assert_eq!(IrPulseBytes(vec![0xC3, 0x05]).to_string(), "0xC3, 0x05");
        assert_eq!(IrSequence(vec![IrPulse(625), IrPulse(1935)]).as_hex(), "271 78F");
    }
}
