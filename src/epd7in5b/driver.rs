//! Panel session: the handshake state machine around one [`Framebuffer`]
//!
//! ```text
//! Unopened --open--> Opened --init--> Initialized --refresh--> Transmitting
//!                                      ^   |  ^                    |
//!                                      |   |  +-- Refreshing <-----+
//!                                 init |   sleep
//!                                      |   v
//!                                      Sleeping          (any) --close--> Closed
//! ```
//!
//! Every step checks the current state and fails with
//! [`PaperError::Sequence`] when it is not allowed. A step that fails halfway
//! leaves the session where it stopped; `init` is accepted from every
//! post-open state except `Closed`, so the recovery is always a re-init.
//! [`PanelSession::power_down`] does that re-init and the sleep in one go.
//! Closing drops the SPI device and the lines.
//!
//! ## Refresh cycle
//!
//! 1. `init` resets the controller, powers it up and clears the framebuffer
//! 1. draw into [`PanelSession::framebuffer_mut`]
//! 1. `display_refresh` sends both planes and waits for the panel
//! 1. `sleep` powers the controller down until the next `init`

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::PanelConfig;
use crate::epd7in5b::interface::DisplayInterface;
use crate::epd7in5b::{cmd::Cmd, flag::Flag};
use crate::error::PaperError;
use crate::framebuffer::Framebuffer;

/// Where a [`PanelSession`] is in the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Lines not configured yet
    Unopened,
    /// Lines configured, controller state unknown
    Opened,
    /// Controller powered and configured, ready for a refresh
    Initialized,
    /// Plane data on its way to the controller
    Transmitting,
    /// Controller is redrawing the panel
    Refreshing,
    /// Controller in deep sleep, needs a re-init
    Sleeping,
    /// Session finished
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::Opened => "opened",
            Self::Initialized => "initialized",
            Self::Transmitting => "transmitting",
            Self::Refreshing => "refreshing",
            Self::Sleeping => "sleeping",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Parameter bytes of Partial Window (0x90) for a byte-aligned window
///
/// Horizontal bounds are given in 8-pixel channel banks, vertical bounds in
/// lines; `x` and `width` must already be multiples of 8.
pub fn partial_window(x: u32, y: u32, width: u32, height: u32) -> [u8; 9] {
    let hrst = x / 8;
    let hred = (x + width - 1) / 8;
    let vrst = y;
    let vred = y + height - 1;
    [
        (hrst >> 5) as u8,
        ((hrst & 0x1F) << 3) as u8,
        (hred >> 5) as u8,
        ((hred & 0x1F) << 3) as u8,
        (vrst >> 8) as u8,
        (vrst & 0xFF) as u8,
        (vred >> 8) as u8,
        (vred & 0xFF) as u8,
        Flag::PT_SCAN,
    ]
}

/// Parameter bytes of Resolution Setting (0x61)
pub fn resolution(width: u32, height: u32) -> [u8; 4] {
    [
        (width >> 8) as u8,
        (width & 0xFF) as u8,
        (height >> 8) as u8,
        (height & 0xFF) as u8,
    ]
}

/// One handshake with the 7.5" black/white/red panel
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication, its transactions frame chip select
/// - `BSY` - BUSY input pin (HIGH when the panel is ready)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for every timed wait
pub struct PanelSession<SPI, BSY, DC, RST, DELAY> {
    /// `None` once closed
    interface: Option<DisplayInterface<SPI, BSY, DC, RST>>,
    delay: DELAY,
    config: PanelConfig,
    framebuffer: Framebuffer,
    state: SessionState,
}

impl<SPI, BSY, DC, RST, DELAY> PanelSession<SPI, BSY, DC, RST, DELAY> {
    /// Create a session over the given lines. Nothing is sent yet.
    ///
    /// Fails with [`PaperError::UnalignedWidth`] when the configured width is
    /// not a multiple of 8.
    pub fn new(
        spi: SPI,
        busy: BSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        config: PanelConfig,
    ) -> Result<Self, PaperError> {
        let framebuffer = Framebuffer::new(config.width, config.height)?;
        let interface = DisplayInterface::new(spi, busy, dc, rst).with_max_burst(config.max_burst);
        Ok(Self {
            interface: Some(interface),
            delay,
            config,
            framebuffer,
            state: SessionState::Unopened,
        })
    }

    /// Current handshake state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Geometry and timings in use
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The frame that the next refresh sends
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Draw target for the next refresh
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// End the session and drop the SPI device and lines. Calling it again
    /// is a no-op.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            log::info!("Closing panel session (was {})", self.state);
            self.state = SessionState::Closed;
        }
        self.interface = None;
    }

    /// Close the session and hand back the interface and the delay.
    ///
    /// The interface is `None` when the session was already closed.
    pub fn release(mut self) -> (Option<DisplayInterface<SPI, BSY, DC, RST>>, DELAY) {
        let interface = self.interface.take();
        self.close();
        (interface, self.delay)
    }

    fn expect_state(&self, operation: &'static str, allowed: &[SessionState]) -> Result<(), PaperError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PaperError::Sequence {
                operation,
                state: self.state,
            })
        }
    }
}

/// The interface of a session that has not been closed
fn held<'a, I>(interface: &'a mut Option<I>, operation: &'static str) -> Result<&'a mut I, PaperError> {
    interface.as_mut().ok_or(PaperError::Sequence {
        operation,
        state: SessionState::Closed,
    })
}

impl<SPI, BSY, DC, RST, DELAY> PanelSession<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Claim the lines and drive them to their idle levels
    pub fn open(&mut self) -> Result<(), PaperError> {
        self.expect_state("open", &[SessionState::Unopened])?;
        held(&mut self.interface, "open")?
            .configure_lines()
            .map_err(|e| PaperError::HardwareAcquisition(format!("setting line levels: {:?}", e)))?;
        self.state = SessionState::Opened;
        log::info!("Panel lines configured");
        Ok(())
    }

    /// Reset and configure the controller, then clear the framebuffer to white
    pub fn init(&mut self) -> Result<(), PaperError> {
        self.expect_state(
            "init",
            &[
                SessionState::Opened,
                SessionState::Initialized,
                SessionState::Transmitting,
                SessionState::Refreshing,
                SessionState::Sleeping,
            ],
        )?;
        log::info!(
            "Initializing {}x{} e-paper panel",
            self.config.width,
            self.config.height
        );
        let interface = held(&mut self.interface, "init")?;
        // Controller state is unknown until this completes
        self.state = SessionState::Opened;

        interface.reset(&mut self.delay)?;

        interface.cmd_with_data(Cmd::POWER_SETTING, &Flag::POWER_SETTING)?;

        interface.cmd(Cmd::POWER_ON)?;
        self.delay.delay_ms(self.config.power_on_settle_ms);
        interface.wait_until_idle(&mut self.delay, &self.config)?;

        interface.cmd_with_data(Cmd::PANEL_SETTING, &[Flag::PANEL_SETTING_KWR_OTP])?;

        interface.cmd_with_data(
            Cmd::RESOLUTION_SETTING,
            &resolution(self.config.width, self.config.height),
        )?;

        self.framebuffer.clear();
        self.state = SessionState::Initialized;
        log::info!("Panel initialized");
        Ok(())
    }

    /// Send both planes and redraw the whole panel
    pub fn display_refresh(&mut self) -> Result<(), PaperError> {
        self.expect_state("refresh", &[SessionState::Initialized])?;
        let interface = held(&mut self.interface, "refresh")?;
        log::info!("Refreshing panel");

        self.state = SessionState::Transmitting;
        interface.cmd(Cmd::DATA_START_TRANSMISSION_1)?;
        interface.data(self.framebuffer.bw().bytes())?;
        interface.cmd(Cmd::DATA_START_TRANSMISSION_2)?;
        interface.data(self.framebuffer.red().bytes())?;

        self.state = SessionState::Refreshing;
        interface.refresh(&mut self.delay, &self.config)?;

        self.state = SessionState::Initialized;
        log::info!("Panel refreshed");
        Ok(())
    }

    /// Send only the window `(x, y, width, height)` and refresh it.
    ///
    /// Experimental: known units transfer the window correctly but still
    /// redraw the whole panel at full-refresh speed. `x` and `width` must be
    /// multiples of 8.
    pub fn display_partial_refresh(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), PaperError> {
        self.expect_state("partial refresh", &[SessionState::Initialized])?;
        let interface = held(&mut self.interface, "partial refresh")?;
        if x % 8 != 0 || width % 8 != 0 {
            return Err(PaperError::MisalignedWindow { x, width });
        }
        let out_of_bounds = PaperError::WindowOutOfBounds {
            x,
            y,
            width,
            height,
        };
        let fits = |start: u32, len: u32, extent: u32| {
            len > 0 && start.checked_add(len).is_some_and(|end| end <= extent)
        };
        if !fits(x, width, self.config.width) || !fits(y, height, self.config.height) {
            return Err(out_of_bounds);
        }
        log::info!(
            "Partial refresh of {}x{} at ({}, {})",
            width,
            height,
            x,
            y
        );

        // The controller is in partial mode from the first byte on
        self.state = SessionState::Transmitting;
        interface.cmd(Cmd::PARTIAL_IN)?;
        interface.cmd_with_data(Cmd::PARTIAL_WINDOW, &partial_window(x, y, width, height))?;
        self.delay.delay_ms(self.config.partial_window_settle_ms);

        interface.cmd(Cmd::DATA_START_TRANSMISSION_1)?;
        for row in y..y + height {
            let bytes = self.framebuffer.bw().subrow(x, row, width).unwrap_or_default();
            interface.data(bytes)?;
        }
        interface.cmd(Cmd::DATA_START_TRANSMISSION_2)?;
        for row in y..y + height {
            let bytes = self.framebuffer.red().subrow(x, row, width).unwrap_or_default();
            interface.data(bytes)?;
        }

        self.state = SessionState::Refreshing;
        interface.refresh(&mut self.delay, &self.config)?;
        interface.cmd(Cmd::PARTIAL_OUT)?;

        self.state = SessionState::Initialized;
        Ok(())
    }

    /// Power off and enter deep sleep. Needs an `init` to wake up.
    pub fn sleep(&mut self) -> Result<(), PaperError> {
        self.expect_state("sleep", &[SessionState::Initialized])?;
        let interface = held(&mut self.interface, "sleep")?;
        log::info!("Putting panel to sleep");

        interface.cmd(Cmd::POWER_OFF)?;
        interface.wait_until_idle(&mut self.delay, &self.config)?;
        interface.cmd_with_data(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK])?;

        self.state = SessionState::Sleeping;
        Ok(())
    }

    /// Get the controller powered off after a failed step.
    ///
    /// Re-initializes when the session stopped halfway, then sleeps. Errors
    /// are logged and swallowed so the caller can report the original
    /// failure. Returns whether the panel ended up sleeping.
    pub fn power_down(&mut self) -> bool {
        match self.state {
            SessionState::Sleeping => return true,
            SessionState::Unopened | SessionState::Closed => return false,
            SessionState::Initialized => {}
            SessionState::Opened | SessionState::Transmitting | SessionState::Refreshing => {
                log::warn!("Re-initializing panel from {} to power it down", self.state);
                if let Err(e) = self.init() {
                    log::warn!("Re-init before power down failed: {}", e);
                    return false;
                }
            }
        }
        match self.sleep() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Power down failed: {}", e);
                false
            }
        }
    }
}
