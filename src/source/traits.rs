use crate::error::Result;

/// Something that yields a raw `go mod graph` style edge list.
pub trait EdgeSource {
    fn describe(&self) -> String;
    fn read(&mut self) -> Result<Vec<u8>>;
}
