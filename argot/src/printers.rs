use std::io::{self, Write as _};

/// Which of a sink's two streams some output belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Usage, help, and version text that was asked for.
    Out,

    /// Error messages.
    Err,
}

/**
Where rendered text goes. A sink receives already-buffered chunks of bytes,
and may route the two streams to the same destination.
*/
pub trait Sink {
    fn out(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn err(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out(bytes)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn out(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).out(bytes)
    }

    #[inline]
    fn err(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).err(bytes)
    }
}

/// Writes to the process's stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSink;

impl Sink for StdSink {
    fn out(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(bytes)
    }

    fn err(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(bytes)
    }
}

/// Collects both streams in memory.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub out: Vec<u8>,
    pub err: Vec<u8>,
}

impl Capture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The normal output, lossily decoded.
    #[must_use]
    pub fn out_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    /// The error output, lossily decoded.
    #[must_use]
    pub fn err_text(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}

impl Sink for Capture {
    fn out(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    fn err(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.err.extend_from_slice(bytes);
        Ok(())
    }
}

/// Adapts a closure into a [`Sink`]; the closure is told which stream each
/// chunk belongs on.
#[derive(Debug, Clone, Copy)]
pub struct FnSink<F>(pub F);

impl<F> Sink for FnSink<F>
where
    F: FnMut(Stream, &[u8]) -> io::Result<()>,
{
    fn out(&mut self, bytes: &[u8]) -> io::Result<()> {
        (self.0)(Stream::Out, bytes)
    }

    fn err(&mut self, bytes: &[u8]) -> io::Result<()> {
        (self.0)(Stream::Err, bytes)
    }
}

pub(crate) const BUFFER_SIZE: usize = 128;

/**
A small write buffer in front of a [`Sink`]. Bytes are handed to the sink
when the buffer fills, when output switches to the other stream, and when
[`drain`][Renderer::drain] is called; every public entry point drains before
returning, error or not.

The renderer also tracks the command path used in usage lines: the program
name, followed by the name of each subcommand branch entered so far.
*/
pub(crate) struct Renderer<'s> {
    sink: &'s mut dyn Sink,
    stream: Stream,
    buffer: Vec<u8>,
    command: String,
}

impl<'s> Renderer<'s> {
    pub fn new(sink: &'s mut dyn Sink, command: &str) -> Self {
        Self {
            sink,
            stream: Stream::Out,
            buffer: Vec::with_capacity(BUFFER_SIZE),
            command: command.to_owned(),
        }
    }

    /// Direct subsequent writes to `stream`, draining anything pending for
    /// the other one first.
    pub fn select(&mut self, stream: Stream) -> io::Result<()> {
        if stream != self.stream {
            self.drain()?;
            self.stream = stream;
        }

        Ok(())
    }

    pub fn drain(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let result = match self.stream {
            Stream::Out => self.sink.out(&self.buffer),
            Stream::Err => self.sink.err(&self.buffer),
        };

        self.buffer.clear();
        result
    }

    /// Descend into the subcommand branch `name`. The fallback branch has
    /// an empty name and doesn't change the command path. Returns the mark to
    /// [`leave`][Renderer::leave] with.
    pub fn enter(&mut self, name: &str) -> usize {
        let mark = self.command.len();

        if !name.is_empty() {
            self.command.push(' ');
            self.command.push_str(name);
        }

        mark
    }

    pub fn leave(&mut self, mark: usize) {
        self.command.truncate(mark);
    }

    pub fn write_command(&mut self) -> io::Result<()> {
        let command = std::mem::take(&mut self.command);
        let result = self.write_all(command.as_bytes());
        self.command = command;
        result
    }
}

impl io::Write for Renderer<'_> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if self.buffer.len() == BUFFER_SIZE {
            self.drain()?;
        }

        let count = bytes.len().min(BUFFER_SIZE - self.buffer.len());
        self.buffer.extend_from_slice(&bytes[..count]);
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()
    }
}
