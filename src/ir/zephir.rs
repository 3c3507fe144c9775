pub mod types;

use thiserror::Error;

use crate::ir::format::ZephirFormat;
use crate::ir::receive::IrReceive;
use crate::ir::types::{ACMode, FanSpeed, IrDecodeError, IrFormat, IrPulseTrain, IrTarget, SwingMode};
use crate::ir::zephir::types::{
    ZephirFrame, ZephirFrameError, ZephirStatus, ZephirTemperatureCode,
};

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ZephirError {
    #[error("Temperature out of range")]
    TemperatureRange,
    #[error("Could not decode ir sequence")]
    Decode(#[from] IrDecodeError),
    #[error("Received an invalid frame")]
    Frame(#[from] ZephirFrameError),
}

/// Zephir ZAS12000 remote. Every command transmits the complete state.
#[derive(Debug, Default)]
pub struct Zephir {
    status: ZephirStatus,
    resume_mode: ACMode,
}

impl Zephir {
    pub fn new(status: ZephirStatus) -> Self {
        let mut zephir = Zephir::default();
        zephir.adopt(status);
        zephir
    }

    pub fn frame(&self) -> ZephirFrame {
        ZephirFrame::encode(&self.status)
    }

    pub fn as_ir_train(&self) -> IrPulseTrain {
        <Self as IrTarget>::Format::encode(self.frame())
    }

    fn adopt(&mut self, status: ZephirStatus) {
        if status.mode != ACMode::Off {
            self.resume_mode = status.mode;
        }
        self.status = status;
    }
}

impl IrTarget for Zephir {
    type Format = ZephirFormat;
    type Error = ZephirError;
    type Temperature = ZephirTemperatureCode;
    const SEQ_LENGTH: usize = ZephirFormat::FRAME_LENGTH * 8 + 2;

    fn power_off(&mut self) -> Result<IrPulseTrain, Self::Error> {
        self.status.powered = false;
        self.status.mode = ACMode::Off;
        Ok(self.as_ir_train())
    }

    fn power_on(&mut self) -> Result<IrPulseTrain, Self::Error> {
        self.status.powered = true;
        self.status.mode = self.resume_mode;
        Ok(self.as_ir_train())
    }

    fn temp_up(&mut self) -> Result<IrPulseTrain, Self::Error> {
        self.status.temperature = self
            .status
            .temperature
            .up()
            .ok_or(ZephirError::TemperatureRange)?;
        Ok(self.as_ir_train())
    }

    fn temp_down(&mut self) -> Result<IrPulseTrain, Self::Error> {
        self.status.temperature = self
            .status
            .temperature
            .down()
            .ok_or(ZephirError::TemperatureRange)?;
        Ok(self.as_ir_train())
    }

    fn temp_set(&mut self, temp: Self::Temperature) -> Result<IrPulseTrain, Self::Error> {
        self.status.temperature = temp;
        Ok(self.as_ir_train())
    }

    fn mode_set(&mut self, mode: ACMode) -> Result<IrPulseTrain, Self::Error> {
        if mode == ACMode::Off {
            return self.power_off();
        }
        self.resume_mode = mode;
        self.status.mode = mode;
        self.status.powered = true;
        Ok(self.as_ir_train())
    }

    fn fan_set(&mut self, fan: FanSpeed) -> Result<IrPulseTrain, Self::Error> {
        self.status.fan = fan;
        Ok(self.as_ir_train())
    }

    fn swing_set(&mut self, swing: SwingMode) -> Result<IrPulseTrain, Self::Error> {
        self.status.swing = swing;
        Ok(self.as_ir_train())
    }

    fn status(&self) -> ZephirStatus {
        self.status
    }

    fn receive<R: IrReceive>(&mut self, receiver: &mut R) -> Result<ZephirStatus, Self::Error> {
        let bytes = Self::Format::decode(receiver)?;
        let status = ZephirFrame::try_from(bytes.0.as_slice())?.decode(&self.status)?;
        debug!("received {}", status);
        self.adopt(status);
        Ok(status)
    }
}
