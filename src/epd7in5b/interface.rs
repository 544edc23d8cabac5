//! Display interface using SPI
use crate::config::PanelConfig;
use crate::epd7in5b::cmd::Cmd;
use crate::error::PaperError;
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Default burst size, the spidev transfer limit
pub const DEFAULT_MAX_BURST: usize = 4096;

/// The four lines of the panel plus the burst limit of the SPI channel
///
/// Chip select is owned by the [`SpiDevice`]: each `write` is one transaction,
/// so every command byte and every data burst is framed on its own.
pub struct DisplayInterface<SPI, BSY, DC, RST> {
    /// SPI device
    spi: SPI,
    /// Low while the controller is busy, high when ready
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Largest data slice written in one transaction
    max_burst: usize,
}

impl<SPI, BSY, DC, RST> DisplayInterface<SPI, BSY, DC, RST> {
    /// Bundle the lines. Nothing is driven until [`Self::configure_lines`].
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            max_burst: DEFAULT_MAX_BURST,
        }
    }

    /// Split data payloads into bursts of at most `max_burst` bytes
    pub fn with_max_burst(mut self, max_burst: usize) -> Self {
        self.max_burst = max_burst.max(1);
        self
    }

    /// Hand the lines back
    pub fn release(self) -> (SPI, BSY, DC, RST) {
        (self.spi, self.busy, self.dc, self.rst)
    }
}

impl<SPI, BSY, DC, RST> DisplayInterface<SPI, BSY, DC, RST>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
{
    /// Put the output lines in their idle levels: reset released, DC on data
    pub(crate) fn configure_lines(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        Ok(())
    }

    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        log::debug!("cmd 0x{:02X} {}", command, Cmd::name(command));

        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Send data, split into framed bursts of at most `max_burst` bytes
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let bursts = data.len().div_ceil(self.max_burst);
        for (i, burst) in data.chunks(self.max_burst).enumerate() {
            if let Err(e) = self.spi.write(burst) {
                log::error!("SPI write error in burst {}/{}: {:?}", i + 1, bursts, e);
                return Err(DisplayError::BusWriteError);
            }
        }
        if bursts > 1 {
            log::debug!("Sent {} bytes in {} bursts", data.len(), bursts);
        }
        Ok(())
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Hardware reset pulse: released 20ms, asserted 2ms, released 20ms
    pub(crate) fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(20);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(2);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Whether the busy line reports ready
    pub(crate) fn is_ready(&mut self) -> Result<bool, PaperError> {
        self.busy.is_high().map_err(|e| {
            log::error!("Busy line read error: {:?}", e);
            PaperError::BusyLine
        })
    }

    /// Poll Get-Status until the busy line goes high, then settle.
    ///
    /// Gives up with [`PaperError::HardwareTimeout`] after
    /// `config.max_busy_polls` polls.
    pub(crate) fn wait_until_idle(
        &mut self,
        delay: &mut impl DelayNs,
        config: &PanelConfig,
    ) -> Result<(), PaperError> {
        log::debug!("Waiting for device to be ready");

        for attempt in 1..=config.max_busy_polls {
            self.cmd(Cmd::GET_STATUS)?;
            if self.is_ready()? {
                log::debug!("Device ready after {} status polls", attempt);
                delay.delay_ms(config.busy_settle_ms);
                return Ok(());
            }
            delay.delay_ms(config.busy_poll_interval_ms);
        }

        log::error!(
            "TIMEOUT waiting for busy line after {} status polls",
            config.max_busy_polls
        );
        Err(PaperError::HardwareTimeout {
            attempts: config.max_busy_polls,
        })
    }

    /// Display Refresh, then wait for the panel to finish redrawing
    pub(crate) fn refresh(
        &mut self,
        delay: &mut impl DelayNs,
        config: &PanelConfig,
    ) -> Result<(), PaperError> {
        self.cmd(Cmd::DISPLAY_REFRESH)?;
        delay.delay_ms(config.refresh_settle_ms);
        self.wait_until_idle(delay, config)
    }
}
