//! Seat controller link.
//!
//! A reader thread owns the controller device. It opens the device file,
//! waiting and retrying while it is absent, frames and decodes each line,
//! stamps it with the arrival time and forwards it to the control loop.
//!
//! Terminal devices are switched to raw mode at 115200 baud so the kernel
//! neither echoes nor line-edits the controller's output. Reads wait at most
//! [`READ_TIMEOUT_MS`] so the thread notices shutdown on an idle link.
//!
//! ```text
//!   open ──fail──► wait retry ──► open
//!    │
//!    ▼
//!   read ──EOF/error──► wait retry ──► open
//!    │
//!    └──► LineFramer ──► decode_line ──► mpsc ──► ControlLoop
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::termios::{self, BaudRate, SetArg};
use standfirst::control::SensorEvent;
use standfirst::protocol::{decode_line, DecodeError, LineFramer};

/// Longest a single read waits for controller bytes.
pub const READ_TIMEOUT_MS: u16 = 100;

/// Controller line speed.
const BAUD: BaudRate = BaudRate::B115200;

/// What the control loop receives from the link.
pub type LinkItem = Result<SensorEvent, DecodeError>;

/// Link settings.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub port: PathBuf,
    pub retry: Duration,
}

/// Cloneable view of the link's connection state.
#[derive(Debug, Clone)]
pub struct LinkStatus {
    connected: Arc<AtomicBool>,
    port: PathBuf,
}

impl LinkStatus {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn port(&self) -> &Path {
        &self.port
    }
}

/// Status handle not attached to any reader, plus its connected flag.
#[cfg(test)]
pub(crate) fn test_status() -> (Arc<AtomicBool>, LinkStatus) {
    let connected = Arc::new(AtomicBool::new(false));
    let status = LinkStatus {
        connected: Arc::clone(&connected),
        port: PathBuf::from("/dev/ttyACM0"),
    };
    (connected, status)
}

/// Controller device opened for reading.
///
/// Reads return [`io::ErrorKind::TimedOut`] when nothing arrives within
/// [`READ_TIMEOUT_MS`].
#[derive(Debug)]
struct SerialPort {
    file: File,
}

impl SerialPort {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(OFlag::O_NOCTTY.bits())
            .open(path)?;
        Self::from_file(file)
    }

    /// Wrap an open device, putting it in raw mode if it is a terminal.
    fn from_file(file: File) -> io::Result<Self> {
        configure_raw(&file)?;
        Ok(Self { file })
    }
}

/// Raw mode: no echo, no canonical line editing, no signal characters.
///
/// Files and pipes that are not terminals are left untouched.
fn configure_raw<F: AsFd>(fd: F) -> io::Result<()> {
    let mut attrs = match termios::tcgetattr(fd.as_fd()) {
        Ok(attrs) => attrs,
        Err(Errno::ENOTTY) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    termios::cfmakeraw(&mut attrs);
    termios::cfsetspeed(&mut attrs, BAUD)?;
    termios::tcsetattr(fd.as_fd(), SetArg::TCSANOW, &attrs)?;
    Ok(())
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(READ_TIMEOUT_MS)) {
            Ok(0) => Err(io::ErrorKind::TimedOut.into()),
            Ok(_) => (&self.file).read(buf),
            Err(Errno::EINTR) => Err(io::ErrorKind::Interrupted.into()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Why a read pump stopped.
#[derive(Debug, PartialEq, Eq)]
enum PumpEnd {
    /// Device closed or returned end of file.
    Eof,
    /// The control loop dropped its receiver.
    ReceiverGone,
    Shutdown,
}

/// Start the reader thread.
///
/// Returns the event receiver for the control loop and a status handle for
/// the display.
pub fn spawn_link(
    config: LinkConfig,
    shutdown: Arc<AtomicBool>,
) -> io::Result<(Receiver<LinkItem>, LinkStatus)> {
    let (tx, rx) = mpsc::channel();
    let connected = Arc::new(AtomicBool::new(false));
    let thread_connected = Arc::clone(&connected);
    let port = config.port.clone();

    thread::Builder::new()
        .name("seat-link".to_string())
        .spawn(move || reader_loop(config, tx, thread_connected, shutdown))?;

    Ok((rx, LinkStatus { connected, port }))
}

fn reader_loop(
    config: LinkConfig,
    tx: Sender<LinkItem>,
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    let mut reported_waiting = false;

    while !shutdown.load(Ordering::SeqCst) {
        let port = match SerialPort::open(&config.port) {
            Ok(port) => port,
            Err(e) => {
                if !reported_waiting {
                    tracing::warn!(
                        port = %config.port.display(),
                        error = %e,
                        "Waiting for seat controller"
                    );
                    reported_waiting = true;
                }
                thread::sleep(config.retry);
                continue;
            }
        };

        tracing::info!(port = %config.port.display(), "Seat controller connected");
        connected.store(true, Ordering::Relaxed);
        reported_waiting = false;

        let end = pump(port, &mut LineFramer::new(), &tx, &shutdown);
        connected.store(false, Ordering::Relaxed);

        match end {
            Ok(PumpEnd::ReceiverGone) | Ok(PumpEnd::Shutdown) => break,
            Ok(PumpEnd::Eof) => {
                tracing::warn!(port = %config.port.display(), "Seat controller closed the link");
            }
            Err(e) => {
                tracing::warn!(
                    port = %config.port.display(),
                    error = %e,
                    "Seat controller read failed"
                );
            }
        }
        thread::sleep(config.retry);
    }

    tracing::debug!("Link reader stopped");
}

/// Read from `reader` until it ends, forwarding every decoded line.
fn pump<R: Read>(
    mut reader: R,
    framer: &mut LineFramer,
    tx: &Sender<LinkItem>,
    shutdown: &AtomicBool,
) -> io::Result<PumpEnd> {
    let mut buf = [0u8; 256];

    loop {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(PumpEnd::Shutdown);
        }

        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(PumpEnd::Eof),
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted
                        | io::ErrorKind::TimedOut
                        | io::ErrorKind::WouldBlock
                ) =>
            {
                continue
            }
            Err(e) => return Err(e),
        };

        let observed_at = Instant::now();
        for line in framer.push(&buf[..n]) {
            let item = line
                .and_then(|line| decode_line(&line))
                .map(|reading| SensorEvent::from_reading(reading, observed_at));
            if tx.send(item).is_err() {
                return Ok(PumpEnd::ReceiverGone);
            }
        }
    }
}
