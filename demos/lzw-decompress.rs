//! Decompresses the input from stdin and writes the result to stdout.

use std::io::{self, Read, Write};

fn main() {
    match (|| -> io::Result<()> {
        let mut data = vec![];
        io::stdin().lock().read_to_end(&mut data)?;
        let mut decoder = lzwr::decode::Decoder::new();
        let decompressed = decoder
            .decode_to_vec(&data)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        io::stdout().lock().write_all(&decompressed)?;
        Ok(())
    })() {
        Ok(()) => (),
        Err(err) => eprintln!("{}", err),
    }
}
