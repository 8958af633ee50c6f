use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::TransferPort;

const SPI_IOC_MAGIC: u32 = b'k' as u32;
const IOC_WRITE: u32 = 1;

/// Linux `_IOW(type, nr, size)` for architectures using the generic ioctl layout.
const fn iow(nr: u32, size: usize) -> u32 {
    (IOC_WRITE << 30) | ((size as u32) << 16) | (SPI_IOC_MAGIC << 8) | nr
}

const SPI_IOC_MESSAGE_1: u32 = iow(0, std::mem::size_of::<SpiIocTransfer>());
const SPI_IOC_WR_MODE: u32 = iow(1, std::mem::size_of::<u8>());
const SPI_IOC_WR_BITS_PER_WORD: u32 = iow(3, std::mem::size_of::<u8>());
const SPI_IOC_WR_MAX_SPEED_HZ: u32 = iow(4, std::mem::size_of::<u32>());

/// `struct spi_ioc_transfer` from `<linux/spi/spidev.h>`.
#[repr(C)]
#[derive(Debug, Default)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    pad: u8,
}

/// spidev device settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiConfig {
    /// Device node, e.g. `/dev/spidev0.0`.
    pub path: PathBuf,
    /// SPI mode bits (CPOL/CPHA). Default: mode 0.
    pub mode: u8,
    /// Default: 8.
    pub bits_per_word: u8,
    /// Default: 500 kHz.
    pub speed_hz: u32,
}

impl SpiConfig {
    pub const DEFAULT_PATH: &'static str = "/dev/spidev0.0";
    pub const DEFAULT_SPEED_HZ: u32 = 500_000;

    /// Default settings for the device at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(Self::DEFAULT_PATH),
            mode: 0,
            bits_per_word: 8,
            speed_hz: Self::DEFAULT_SPEED_HZ,
        }
    }
}

/// A [`TransferPort`] over a Linux spidev character device.
///
/// The device is closed when the port is dropped.
pub struct SpidevPort {
    file: File,
    config: SpiConfig,
}

impl SpidevPort {
    /// Open the device and apply mode, word size and clock speed.
    pub fn open(config: SpiConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.path)
            .map_err(|source| TransportError::Open {
                path: config.path.clone(),
                source,
            })?;
        debug!(path = ?config.path, "spi device opened");

        let port = Self { file, config };
        port.write_setting("mode", SPI_IOC_WR_MODE, &port.config.mode)?;
        port.write_setting(
            "bits per word",
            SPI_IOC_WR_BITS_PER_WORD,
            &port.config.bits_per_word,
        )?;
        port.write_setting(
            "max speed",
            SPI_IOC_WR_MAX_SPEED_HZ,
            &port.config.speed_hz,
        )?;
        debug!(
            mode = port.config.mode,
            bits_per_word = port.config.bits_per_word,
            speed_hz = port.config.speed_hz,
            "spi device configured"
        );

        Ok(port)
    }

    fn write_setting<T>(&self, setting: &'static str, request: u32, value: &T) -> Result<()> {
        // SAFETY: `value` points to a live `T` whose size matches the size
        // encoded in `request`, and the fd is owned by `self.file`.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                request as _,
                value as *const T,
            )
        };
        if rc < 0 {
            return Err(TransportError::Configure {
                setting,
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    /// The device node this port was opened on.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Active device settings.
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }
}

impl TransferPort for SpidevPort {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize> {
        if tx.len() != rx.len() {
            return Err(TransportError::LengthMismatch {
                tx: tx.len(),
                rx: rx.len(),
            });
        }
        let len = u32::try_from(tx.len()).map_err(|_| {
            TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "transfer too large for a single spi message",
            ))
        })?;

        let message = SpiIocTransfer {
            tx_buf: tx.as_ptr() as u64,
            rx_buf: rx.as_mut_ptr() as u64,
            len,
            speed_hz: self.config.speed_hz,
            bits_per_word: self.config.bits_per_word,
            ..SpiIocTransfer::default()
        };

        // SAFETY: `tx` and `rx` are valid for `len` bytes for the whole call and
        // `message` matches the kernel's `spi_ioc_transfer` layout.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                SPI_IOC_MESSAGE_1 as _,
                &message as *const SpiIocTransfer,
            )
        };
        if rc < 0 {
            return Err(TransportError::Io(std::io::Error::last_os_error()));
        }

        trace!(bytes = rc, "spi transfer complete");
        Ok(rc as usize)
    }
}

impl std::fmt::Debug for SpidevPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpidevPort")
            .field("path", &self.config.path)
            .field("speed_hz", &self.config.speed_hz)
            .finish()
    }
}
