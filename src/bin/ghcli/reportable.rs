use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::args::OutputArgs;

/// A trait for things that can be output as a document.
///
/// This trait is used to factor output-related code, such as friendly handling of buffering, into
/// one place.
pub trait Reportable {
    type Format;

    fn report<W: std::io::Write>(&self, format: Self::Format, writer: W) -> Result<()>;
}

/// Write `reportable` to the destination given by `output_args`.
pub fn write_report<R, F>(reportable: &R, output_args: &OutputArgs<F>) -> Result<()>
where
    R: Reportable<Format = F>,
    F: ValueEnum + Send + Sync + Copy + 'static,
{
    let writer = output_args
        .get_writer()
        .context("Failed to open output destination for writing")?;
    match reportable.report(output_args.format, writer) {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            // Ignore SIGPIPE errors, like those that can come from piping to `head`
            Some(io_err) if io_err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
            _ => Err(e),
        },
    }
}
