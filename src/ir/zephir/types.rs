use std::convert::TryFrom;
use std::fmt::{self, Display};
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

use crate::ir::format::ZephirFormat;
use crate::ir::types::{ACMode, FanSpeed, IrFormat, IrStatus, SwingMode, TemperatureCode};

pub const FRAME_LENGTH: usize = ZephirFormat::FRAME_LENGTH;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ZephirTemperatureCode(u8);

impl ZephirTemperatureCode {
    pub const MIN: u8 = 16;
    pub const MAX: u8 = 30;

    pub const fn celsius(&self) -> u8 {
        self.0
    }

    pub fn down(&self) -> Option<ZephirTemperatureCode> {
        Self::try_from(u32::from(self.0) - 1).ok()
    }

    pub fn up(&self) -> Option<ZephirTemperatureCode> {
        Self::try_from(u32::from(self.0) + 1).ok()
    }

    pub fn items() -> impl Iterator<Item = ZephirTemperatureCode> {
        (Self::MIN..=Self::MAX).map(ZephirTemperatureCode)
    }
}

impl Default for ZephirTemperatureCode {
    fn default() -> Self {
        ZephirTemperatureCode(24)
    }
}

impl TemperatureCode for ZephirTemperatureCode {}

#[derive(Error, Debug)]
#[error("Invalid temperature code, expected {} to {}", ZephirTemperatureCode::MIN, ZephirTemperatureCode::MAX)]
pub struct InvalidZephirTemperatureCode;

impl TryFrom<u32> for ZephirTemperatureCode {
    type Error = InvalidZephirTemperatureCode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            v if v >= Self::MIN.into() && v <= Self::MAX.into() => {
                Ok(ZephirTemperatureCode(v as u8))
            }
            _ => Err(InvalidZephirTemperatureCode),
        }
    }
}

impl FromStr for ZephirTemperatureCode {
    type Err = InvalidZephirTemperatureCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| InvalidZephirTemperatureCode)
            .and_then(ZephirTemperatureCode::try_from)
    }
}

impl From<ZephirTemperatureCode> for u32 {
    fn from(code: ZephirTemperatureCode) -> Self {
        code.0.into()
    }
}

pub type ZephirStatus = IrStatus<ZephirTemperatureCode>;

/// Bidirectional mapping between a setting and its byte code. Values with no
/// entry have no code and codes with no entry decode to nothing.
#[derive(Debug)]
pub struct CodeTable<V: 'static> {
    entries: &'static [(V, u8)],
}

impl<V: Copy + PartialEq> CodeTable<V> {
    pub const fn new(entries: &'static [(V, u8)]) -> Self {
        CodeTable { entries }
    }

    pub fn code(&self, value: V) -> Option<u8> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, c)| *c)
    }

    pub fn value(&self, code: u8) -> Option<V> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(v, _)| *v)
    }
}

#[derive(Debug)]
pub struct ZephirCodes {
    /// Fixed identifier bytes as (index, value).
    pub statics: [(usize, u8); 4],
    pub button: u8,
    pub power_on: u8,
    pub power_off: u8,
    pub temperature_offset: u8,
    pub swing_mask: u8,
    pub swing: CodeTable<SwingMode>,
    pub fan: CodeTable<FanSpeed>,
    pub mode: CodeTable<ACMode>,
}

pub const ZEPHIR_CODES: ZephirCodes = ZephirCodes {
    statics: [(0, 0xC3), (2, 0x20), (3, 0x12), (10, 0x20)],
    button: 0x05,
    power_on: 0x20,
    power_off: 0x00,
    temperature_offset: 8,
    swing_mask: 0x07,
    swing: CodeTable::new(&[(SwingMode::Off, 0x00), (SwingMode::Vertical, 0x07)]),
    fan: CodeTable::new(&[
        (FanSpeed::Auto, 0xA0),
        (FanSpeed::High, 0x60),
        (FanSpeed::Medium, 0x40),
        (FanSpeed::Low, 0x20),
    ]),
    mode: CodeTable::new(&[
        (ACMode::Auto, 0x00),
        (ACMode::Cool, 0x20),
        (ACMode::Dry, 0x40),
        (ACMode::Heat, 0x80),
        (ACMode::FanOnly, 0xC0),
    ]),
};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ZephirFrameError {
    #[error("Frame must be {} bytes, got {}", FRAME_LENGTH, .0)]
    Length(usize),
    #[error("Static byte {index} was 0x{found:02X}, expected 0x{expected:02X}")]
    StaticMismatch { index: usize, expected: u8, found: u8 },
    #[error("Checksum was 0x{found:02X}, expected 0x{expected:02X}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

pub type FrameResult<T> = std::result::Result<T, ZephirFrameError>;

/// One complete 13 byte command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ZephirFrame([u8; FRAME_LENGTH]);

impl ZephirFrame {
    const TEMPERATURE_SWING: usize = 1;
    const FAN: usize = 4;
    const MODE: usize = 6;
    const POWER: usize = 9;
    const BUTTON: usize = 11;
    const CHECKSUM: usize = 12;

    pub fn encode(status: &ZephirStatus) -> Self {
        let codes = &ZEPHIR_CODES;
        let mut bytes = [0u8; FRAME_LENGTH];
        for (index, value) in codes.statics {
            bytes[index] = value;
        }
        bytes[Self::TEMPERATURE_SWING] = ((status.temperature.celsius()
            - codes.temperature_offset)
            << 3)
            | codes.swing.code(status.swing).unwrap_or_default();
        bytes[Self::FAN] = codes.fan.code(status.fan).unwrap_or_default();
        bytes[Self::MODE] = codes.mode.code(status.mode).unwrap_or_default();
        bytes[Self::POWER] = if status.powered {
            codes.power_on
        } else {
            codes.power_off
        };
        bytes[Self::BUTTON] = codes.button;

        let mut frame = ZephirFrame(bytes);
        frame.0[Self::CHECKSUM] = frame.compute_checksum();
        frame
    }

    /// Interprets the frame on top of `previous`. Fields the frame carries no
    /// known code for keep their previous value.
    pub fn decode(&self, previous: &ZephirStatus) -> FrameResult<ZephirStatus> {
        self.validate()?;

        let codes = &ZEPHIR_CODES;
        let mut status = *previous;
        if self.power() != codes.power_on {
            status.powered = false;
            status.mode = ACMode::Off;
            return Ok(status);
        }

        status.powered = true;
        // byte 1 can carry 8..=39, anything outside 16..=30 counts as unmapped
        match ZephirTemperatureCode::try_from(u32::from(self.temperature())) {
            Ok(temperature) => status.temperature = temperature,
            Err(_) => debug!("ignoring temperature {}", self.temperature()),
        }
        match codes.swing.value(self.swing()) {
            Some(swing) => status.swing = swing,
            None => debug!("ignoring swing code 0x{:02X}", self.swing()),
        }
        match codes.fan.value(self.fan()) {
            Some(fan) => status.fan = fan,
            None => debug!("ignoring fan code 0x{:02X}", self.fan()),
        }
        match codes.mode.value(self.mode()) {
            Some(mode) => status.mode = mode,
            None => debug!("ignoring mode code 0x{:02X}", self.mode()),
        }
        Ok(status)
    }

    pub fn validate(&self) -> FrameResult<()> {
        if let Some((index, expected)) = ZEPHIR_CODES
            .statics
            .iter()
            .copied()
            .find(|(index, expected)| self.0[*index] != *expected)
        {
            debug!("static bytes fail");
            return Err(ZephirFrameError::StaticMismatch {
                index,
                expected,
                found: self.0[index],
            });
        }

        let expected = self.compute_checksum();
        if self.checksum() != expected {
            debug!("checksum fail");
            return Err(ZephirFrameError::ChecksumMismatch {
                expected,
                found: self.checksum(),
            });
        }
        Ok(())
    }

    /// Unmasked sum of every byte before the checksum.
    pub fn compute_checksum(&self) -> u8 {
        self.0[..Self::CHECKSUM]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    pub fn temperature(&self) -> u8 {
        (self.0[Self::TEMPERATURE_SWING] >> 3) + ZEPHIR_CODES.temperature_offset
    }

    pub fn swing(&self) -> u8 {
        self.0[Self::TEMPERATURE_SWING] & ZEPHIR_CODES.swing_mask
    }

    pub fn fan(&self) -> u8 {
        self.0[Self::FAN]
    }

    pub fn mode(&self) -> u8 {
        self.0[Self::MODE]
    }

    pub fn power(&self) -> u8 {
        self.0[Self::POWER]
    }

    pub fn button(&self) -> u8 {
        self.0[Self::BUTTON]
    }

    pub fn checksum(&self) -> u8 {
        self.0[Self::CHECKSUM]
    }

    pub fn bytes(&self) -> &[u8; FRAME_LENGTH] {
        &self.0
    }
}

impl From<[u8; FRAME_LENGTH]> for ZephirFrame {
    fn from(bytes: [u8; FRAME_LENGTH]) -> Self {
        ZephirFrame(bytes)
    }
}

impl TryFrom<&[u8]> for ZephirFrame {
    type Error = ZephirFrameError;

    fn try_from(bytes: &[u8]) -> FrameResult<Self> {
        <[u8; FRAME_LENGTH]>::try_from(bytes)
            .map(ZephirFrame)
            .map_err(|_| ZephirFrameError::Length(bytes.len()))
    }
}

impl AsRef<[u8]> for ZephirFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for ZephirFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|b| format!("{:02X}", b)).join(" "))
    }
}
