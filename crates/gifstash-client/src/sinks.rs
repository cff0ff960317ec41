use std::io;

/// Receives a copied GIF URL. Real frontends back this with the system
/// clipboard; the CLI prints it; tests capture it.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> io::Result<()>;
}

/// Receives downloaded GIF bytes under a suggested filename.
pub trait FileSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()>;
}
