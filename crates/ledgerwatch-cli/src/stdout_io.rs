use std::io::{self, Write};

/// Line-oriented stdout writer. A closed pipe (`ledgerwatch analyze x | head`)
/// is treated as a successful write.
pub struct StdoutSink<W: Write = io::Stdout> {
    writer: W,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write> StdoutSink<W> {
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        tolerate_broken_pipe(self.writer.write_all(text.as_bytes()))?;
        tolerate_broken_pipe(self.writer.flush())
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        tolerate_broken_pipe(self.writer.write_all(text.as_bytes()))?;
        tolerate_broken_pipe(self.writer.write_all(b"\n"))?;
        tolerate_broken_pipe(self.writer.flush())
    }
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::StdoutSink;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_line_appends_a_newline() {
        let mut sink = StdoutSink::with_writer(Vec::new());
        assert!(sink.write_line("report").is_ok());
        assert_eq!(sink.into_inner(), b"report\n".to_vec());
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        let mut sink = StdoutSink::with_writer(ClosedPipe);
        assert!(sink.write_line("report").is_ok());
        assert!(sink.write_text("report").is_ok());
    }

    #[test]
    fn other_write_failures_propagate() {
        let mut sink = StdoutSink::with_writer(FullDisk);
        assert!(sink.write_line("report").is_err());
    }
}
