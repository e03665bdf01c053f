use super::transcript::parse_transcript;
use crate::core::RecognizedToken;
use crate::encoder::write_wav;
use crate::error::{SyncError, SyncResult};
use crate::processor::Segment;
use log::debug;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Placeholder replaced by the segment WAV path in command arguments
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// How often a running child is checked against its deadline
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external speech-to-text program once per segment.
///
/// The segment is written to a temporary 32-bit float WAV; every argument
/// equal to or containing [`INPUT_PLACEHOLDER`] gets the file path spliced in
/// (the path is appended as the last argument when no placeholder is given).
/// The program must print word-timestamped transcript JSON on stdout, with
/// times relative to the start of the file.
///
/// A program still running at the deadline is killed and reaped, and its
/// segment file removed, before the call returns.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Create a recognizer invoking `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandRecognizer {
            program: program.into(),
            args,
        }
    }

    fn command_args(&self, input: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(INPUT_PLACEHOLDER, input))
            .collect();
        if !self.args.iter().any(|a| a.contains(INPUT_PLACEHOLDER)) {
            args.push(input.to_string());
        }
        args
    }
}

/// Drain a child pipe on its own thread so a chatty program never blocks
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Kill the child and everything it started
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child leads its own process group
    let _ = Command::new("kill")
        .args(["-9", &format!("-{}", child.id())])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = child.kill() {
        debug!("Recognizer process {} already gone: {}", child.id(), e);
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::warn!("Failed to kill recognizer process {}: {}", child.id(), e);
    }
}

/// Wait for `child` to exit; past `timeout` it is killed and `None` returned
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> SyncResult<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_tree(child);
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl super::Recognizer for CommandRecognizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn enforces_timeout(&self) -> bool {
        true
    }

    fn recognize(
        &self,
        segment: &Segment,
        timeout: Option<Duration>,
    ) -> SyncResult<Vec<RecognizedToken>> {
        let wav = tempfile::Builder::new()
            .prefix("lyricsync-segment-")
            .suffix(".wav")
            .tempfile()?;
        write_wav(wav.path(), &segment.signal)?;

        let input = wav.path().to_string_lossy().into_owned();
        let args = self.command_args(&input);
        debug!("Segment {}: running {} {:?}", segment.index, self.program, args);

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);
        let mut child = command.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_with_deadline(&mut child, timeout)? else {
            return Err(SyncError::recognition(
                segment.index,
                format!(
                    "{} killed after {:.1}s",
                    self.program,
                    timeout.map(|t| t.as_secs_f64()).unwrap_or_default()
                ),
            ));
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        if !status.success() {
            return Err(SyncError::recognition(
                segment.index,
                format!(
                    "{} exited with {}: {}",
                    self.program,
                    status,
                    String::from_utf8_lossy(&stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_transcript(&stdout)
    }
}
