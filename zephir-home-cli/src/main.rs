extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::convert::{Infallible, TryFrom};
use std::num::ParseIntError;

use eyre::{Result, WrapErr};
use structopt::StructOpt;
use zephir_home::ir::receive::{IrSequenceReader, DEFAULT_TOLERANCE};
use zephir_home::ir::transmit::{IrOut, IrTransmit};
use zephir_home::ir::types::{
    ACMode, FanSpeed, IrPulse, IrPulseTrain, IrSequence, IrTarget, SwingMode,
};
use zephir_home::ir::zephir::types::{ZephirFrame, ZephirStatus, ZephirTemperatureCode};
use zephir_home::ir::zephir::Zephir;

fn parse_byte(src: &str) -> Result<u8, ParseIntError> {
    u8::from_str_radix(src.trim_start_matches("0x"), 16)
}

#[derive(StructOpt, Debug)]
struct AcState {
    #[structopt(short, long)]
    unpowered: bool,
    #[structopt(short, long, default_value = "cool")]
    mode: ACMode,
    #[structopt(short, long, default_value = "auto")]
    fan: FanSpeed,
    #[structopt(short, long, default_value = "off")]
    swing: SwingMode,
    #[structopt(short, long, default_value = "24")]
    temperature: ZephirTemperatureCode,
}

impl AcState {
    fn status(&self) -> ZephirStatus {
        ZephirStatus {
            powered: !self.unpowered && self.mode != ACMode::Off,
            mode: if self.unpowered { ACMode::Off } else { self.mode },
            fan: self.fan,
            swing: self.swing,
            temperature: self.temperature,
        }
    }
}

#[derive(StructOpt, Debug)]
enum Opt {
    /// Encode a state into a pulse train
    Encode {
        #[structopt(flatten)]
        state: AcState,

        /// Print durations as hex
        #[structopt(long)]
        hex: bool,
    },
    /// Decode a captured pulse sequence
    Decode {
        /// Allowed relative deviation from nominal durations
        #[structopt(long, default_value = "0.35")]
        tolerance: f64,

        /// Durations are hex encoded
        #[structopt(long)]
        hex: bool,

        /// Alternating mark and space durations in microseconds
        pulses: Vec<String>,
    },
    /// Validate and interpret raw frame bytes
    Frame {
        /// Hex bytes, 13 of them
        #[structopt(parse(try_from_str = parse_byte))]
        bytes: Vec<u8>,
    },
}

#[derive(Debug)]
struct PrintTransmitter {
    hex: bool,
}

impl IrTransmit for PrintTransmitter {
    type Error = Infallible;

    fn transmit(&mut self, train: &IrPulseTrain) -> Result<(), Self::Error> {
        let sequence = train.to_sequence();
        println!("Carrier: {} Hz", train.carrier_frequency);
        if self.hex {
            println!("Pulses: {}", sequence.as_hex());
        } else {
            println!(
                "Pulses: {}",
                sequence
                    .into_inner()
                    .iter()
                    .map(|p| p.into_inner().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }
        Ok(())
    }
}

fn parse_pulses(pulses: &[String], hex: bool) -> Result<IrSequence> {
    pulses
        .iter()
        .flat_map(|p| p.split(',').map(str::trim).filter(|p| !p.is_empty()))
        .map(|p| {
            let duration = if hex {
                u128::from_str_radix(p, 16)
            } else {
                p.parse::<u128>()
            };
            duration
                .map(IrPulse)
                .wrap_err_with(|| format!("Could not parse pulse {:?}", p))
        })
        .collect::<Result<Vec<_>>>()
        .map(IrSequence)
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let opts = Opt::from_args();

    debug!("opts: {:?}", opts);

    match opts {
        Opt::Encode { state, hex } => {
            let mut ir_out = IrOut::new(Zephir::new(state.status()), PrintTransmitter { hex });
            println!("State: {}", ir_out.target().status());
            println!("Frame: {}", ir_out.target().frame());
            ir_out
                .send_target(|z| Ok(z.as_ir_train()))
                .wrap_err("Could not send pulse train")?;
        }
        Opt::Decode {
            tolerance,
            hex,
            pulses,
        } => {
            if tolerance != DEFAULT_TOLERANCE {
                info!("using tolerance {}", tolerance);
            }
            let sequence = parse_pulses(&pulses, hex)?;
            let mut reader = IrSequenceReader::with_tolerance(&sequence, tolerance);
            let mut zephir = Zephir::default();
            let status = zephir
                .receive(&mut reader)
                .wrap_err("Could not decode pulse sequence")?;
            println!("Received: {}", status);
            if !reader.remaining().is_empty() {
                warn!("{} trailing pulses ignored", reader.remaining().len());
            }
        }
        Opt::Frame { bytes } => {
            let frame = ZephirFrame::try_from(bytes.as_slice()).wrap_err("Invalid frame")?;
            let status = frame
                .decode(&ZephirStatus::default())
                .wrap_err("Invalid frame")?;
            println!("Frame: {}", frame);
            println!("State: {}", status);
        }
    }

    Ok(())
}
