//! Compresses the input from stdin and writes the result to stdout.

use std::io::{self, Read, Write};

fn main() {
    match (|| -> io::Result<()> {
        let mut data = vec![];
        io::stdin().lock().read_to_end(&mut data)?;
        let mut encoder = lzwr::encode::Encoder::new();
        let compressed = encoder.encode_to_vec(&data);
        io::stdout().lock().write_all(&compressed)?;
        Ok(())
    })() {
        Ok(()) => (),
        Err(err) => eprintln!("{}", err),
    }
}
