use std::convert::Infallible;
use std::fmt::Debug;

use thiserror::Error;

use crate::ir::types::{IrPulseTrain, IrTarget};

/// Anything that can put a pulse train on the air. Implementations own
/// carrier modulation and timing accuracy.
pub trait IrTransmit {
    type Error: std::error::Error + Send + Sync + 'static;
    fn transmit(&mut self, train: &IrPulseTrain) -> Result<(), Self::Error>;
}

/// Records every train instead of sending it.
impl IrTransmit for Vec<IrPulseTrain> {
    type Error = Infallible;

    fn transmit(&mut self, train: &IrPulseTrain) -> Result<(), Self::Error> {
        self.push(train.clone());
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum IrOutError<T: IrTarget + Debug, X: IrTransmit + Debug> {
    #[error(transparent)]
    IrTarget(T::Error),
    #[error("Could not transmit ir sequence")]
    Transmit(#[source] X::Error),
}

pub type SendResult<T, X> = Result<(), IrOutError<T, X>>;

/// Keeps a target's state and the transmitter it talks through together.
pub struct IrOut<T: IrTarget, X: IrTransmit> {
    target: T,
    transmitter: X,
}

impl<T: IrTarget + Debug, X: IrTransmit + Debug> IrOut<T, X> {
    pub fn new(target: T, transmitter: X) -> Self {
        IrOut {
            target,
            transmitter,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn transmitter(&self) -> &X {
        &self.transmitter
    }

    pub fn into_inner(self) -> (T, X) {
        (self.target, self.transmitter)
    }

    pub fn send(&mut self, train: &IrPulseTrain) -> SendResult<T, X> {
        debug!("sending sequence: {:?}", train.to_sequence());
        self.transmitter
            .transmit(train)
            .map_err(IrOutError::Transmit)
    }

    pub fn send_target<F: FnMut(&mut T) -> Result<IrPulseTrain, T::Error>>(
        &mut self,
        mut action: F,
    ) -> SendResult<T, X> {
        let train = action(&mut self.target).map_err(IrOutError::IrTarget)?;
        self.send(&train)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::types::{ACMode, FanSpeed};
    use crate::ir::zephir::types::ZephirTemperatureCode;
    use crate::ir::zephir::{Zephir, ZephirError};
    use std::convert::TryFrom;

    #[test]
    fn send_target_transmits_each_command() {
        let mut out = IrOut::new(Zephir::default(), Vec::new());
        out.send_target(|z| z.mode_set(ACMode::Cool)).unwrap();
        out.send_target(|z| z.fan_set(FanSpeed::Low)).unwrap();
        out.send_target(|z| z.temp_set(ZephirTemperatureCode::try_from(18).unwrap()))
            .unwrap();

        let (zephir, sent) = out.into_inner();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2], zephir.as_ir_train());
    }

    #[test]
    fn target_errors_are_not_transmitted() {
        let mut out = IrOut::new(Zephir::default(), Vec::new());
        out.send_target(|z| z.temp_set(ZephirTemperatureCode::try_from(30).unwrap()))
            .unwrap();
        match out.send_target(|z| z.temp_up()) {
            Err(IrOutError::IrTarget(ZephirError::TemperatureRange)) => {}
            other => panic!("expected temperature range error, got {:?}", other),
        }
        assert_eq!(out.transmitter().len(), 1);
    }
}
