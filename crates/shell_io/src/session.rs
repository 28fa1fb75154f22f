//! Persistent shell session with end-of-command framing.

use std::io::{self, BufRead, BufReader, PipeReader, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use encoding_rs::Encoding;

use crate::{ShellError, join_argv};

/// Marker echoed after every command to delimit its output.
pub const END_OF_COMMAND: &str = "ADBSYNC 7C1E END OF COMMAND";

/// Request/response channel to a remote shell.
pub trait ShellChannel {
    /// Runs `argv` as one command and returns its output lines.
    ///
    /// Lines are decoded and stripped of trailing `\r`/`\n`. Standard error
    /// is interleaved with standard output.
    fn run(&mut self, argv: &[&str]) -> Result<Vec<String>, ShellError>;
}

/// Resolves a WHATWG encoding label such as `UTF-8` or `latin1`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, ShellError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ShellError::UnknownEncoding(label.to_owned()))
}

/// Owns an interactive shell subprocess and exchanges framed commands with it.
pub struct ShellSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<PipeReader>,
    encoding: &'static Encoding,
    finished: bool,
}

impl ShellSession {
    /// Spawns `command` with piped standard input and standard error folded
    /// into standard output.
    pub fn spawn(mut command: Command, encoding: &'static Encoding) -> Result<Self, ShellError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let (reader, writer) = io::pipe()?;
        let error_writer = writer.try_clone()?;
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(error_writer));

        let mut child = command
            .spawn()
            .map_err(|source| ShellError::Spawn { program, source })?;
        // The parent's copies of the write end must go away, otherwise the
        // reader never observes end of file.
        drop(command);

        let stdin = child.stdin.take();
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(reader),
            encoding,
            finished: false,
        })
    }

    /// Closes standard input and waits for the shell to exit.
    pub fn close(mut self) -> io::Result<ExitStatus> {
        self.finish()
    }

    fn finish(&mut self) -> io::Result<ExitStatus> {
        self.finished = true;
        if let Some(mut stdin) = self.stdin.take() {
            // Dropping the handle closes the pipe once pending bytes are out.
            if let Err(error) = stdin.flush() {
                tracing::debug!(%error, "flushing shell input on close failed");
            }
        }
        self.child.wait()
    }

    fn write_request(&mut self, line: &str) -> Result<(), ShellError> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "stdin has already been closed")
        })?;
        let (bytes, _, _) = self.encoding.encode(line);
        stdin.write_all(&bytes)?;
        Ok(())
    }

    fn read_line(&mut self, buffer: &mut Vec<u8>) -> Result<Option<String>, ShellError> {
        buffer.clear();
        if self.stdout.read_until(b'\n', buffer)? == 0 {
            return Ok(None);
        }
        while matches!(buffer.last(), Some(b'\n' | b'\r')) {
            buffer.pop();
        }
        let (text, _) = self.encoding.decode_without_bom_handling(buffer);
        Ok(Some(text.into_owned()))
    }
}

impl ShellChannel for ShellSession {
    fn run(&mut self, argv: &[&str]) -> Result<Vec<String>, ShellError> {
        let command_line = join_argv(argv);
        tracing::trace!(command = %command_line, "shell request");

        // Request and marker go out in one write so the pair is never split.
        self.write_request(&format!(
            "{command_line} </dev/null\n{} </dev/null\n",
            join_argv(&["echo", END_OF_COMMAND])
        ))?;
        if let Some(stdin) = self.stdin.as_mut() {
            stdin.flush()?;
        }

        let mut lines = Vec::new();
        let mut buffer = Vec::new();
        loop {
            match self.read_line(&mut buffer)? {
                Some(line) if line == END_OF_COMMAND => break,
                Some(line) => {
                    tracing::trace!(line = %line, "shell reply");
                    lines.push(line);
                }
                None => {
                    return Err(ShellError::UnexpectedEof {
                        command: command_line,
                        output: lines,
                    });
                }
            }
        }
        Ok(lines)
    }
}

impl Drop for ShellSession {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.finish();
        }
    }
}
