use std::process::Stdio;

/// Anything that can stand in for one of the delegate's standard streams.
///
/// A blanket implementation exists for any type that implements `Into<Stdio>`
/// (e.g. `File`, `std::io::Stdout`).
pub trait Stream {
    /// Convert this stream into a [`Stdio`] handle for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Into<Stdio>> Stream for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// The parent's own stream, handed to the child without any buffering.
pub struct Inherited;

impl Stream for Inherited {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}

/// Standard stream wiring of one delegate invocation.
pub struct StreamWiring {
    pub(crate) stdin: Box<dyn Stream>,
    pub(crate) stdout: Box<dyn Stream>,
    pub(crate) stderr: Box<dyn Stream>,
}

impl StreamWiring {
    /// Pass all three streams straight through to the child.
    pub fn inherit() -> Self {
        Self {
            stdin: Box::new(Inherited),
            stdout: Box::new(Inherited),
            stderr: Box::new(Inherited),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Stream + 'static) -> Self {
        self.stdout = Box::new(stdout);
        self
    }
}

impl Default for StreamWiring {
    fn default() -> Self {
        Self::inherit()
    }
}

impl std::fmt::Debug for StreamWiring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamWiring").finish_non_exhaustive()
    }
}
