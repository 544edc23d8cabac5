//! Panel lines on a Raspberry Pi: spidev for the bus, gpio-cdev for the pins

use core::fmt::Display;

use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};

use crate::config::PanelConfig;
use crate::epd7in5b::driver::PanelSession;
use crate::epd7in5b::pins::Pins;
use crate::error::PaperError;

/// Panel session over Linux device nodes
pub type LinuxPanel = PanelSession<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

const SPI_SPEED_HZ: u32 = 4_000_000;

fn acquisition(what: &str, e: impl Display) -> PaperError {
    PaperError::HardwareAcquisition(format!("{}: {}", what, e))
}

fn request(
    chip: &mut Chip,
    offset: u32,
    flags: LineRequestFlags,
    default: u8,
    label: &str,
) -> Result<CdevPin, PaperError> {
    let line = chip
        .get_line(offset)
        .map_err(|e| acquisition(&format!("getting line {}", offset), e))?;
    let handle = line
        .request(flags, default, label)
        .map_err(|e| acquisition(&format!("requesting {}", label), e))?;
    CdevPin::new(handle).map_err(|e| acquisition(&format!("creating {} pin", label), e))
}

/// Claim the SPI device and the GPIO lines named in `config`
pub fn acquire(config: PanelConfig) -> Result<LinuxPanel, PaperError> {
    log::info!(
        "Opening {} (CS on BCM {}) and {}",
        config.spi_path,
        Pins::CS,
        config.gpio_path
    );

    let mut spi = SpidevDevice::open(&config.spi_path)
        .map_err(|e| acquisition(&format!("opening {}", config.spi_path), e))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)
        .map_err(|e| acquisition("configuring SPI", e))?;

    let mut chip = Chip::new(&config.gpio_path)
        .map_err(|e| acquisition(&format!("opening {}", config.gpio_path), e))?;
    let rst = request(&mut chip, Pins::RST, LineRequestFlags::OUTPUT, 1, "kitchenthing-rst")?;
    let dc = request(&mut chip, Pins::DC, LineRequestFlags::OUTPUT, 0, "kitchenthing-dc")?;
    let busy = request(&mut chip, Pins::BUSY, LineRequestFlags::INPUT, 0, "kitchenthing-busy")?;

    PanelSession::new(spi, busy, dc, rst, Delay, config)
}
