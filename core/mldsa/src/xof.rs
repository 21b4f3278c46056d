//! SHAKE adapters over the `sha3` crate.
//!
//! The samplers consume the sponge through an absorb -> finalize -> squeeze
//! discipline with block-aligned reads (168 bytes for SHAKE128, 136 for
//! SHAKE256). The absorbing and squeezing phases are separate types and
//! `finalize` consumes the absorbing state, so re-absorbing after a squeeze
//! does not compile.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake128Reader, Shake256, Shake256Reader};

/// SHAKE128 rate in bytes.
pub(crate) const SHAKE128_RATE: usize = 168;

/// SHAKE256 rate in bytes.
pub(crate) const SHAKE256_RATE: usize = 136;

/// SHAKE128 in the absorbing phase.
pub(crate) struct Xof128 {
    state: Shake128,
}

/// SHAKE128 in the squeezing phase.
pub(crate) struct Xof128Reader {
    reader: Shake128Reader,
}

impl Xof128 {
    pub(crate) fn init() -> Self {
        Self { state: Shake128::default() }
    }

    pub(crate) fn absorb(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    pub(crate) fn finalize(self) -> Xof128Reader {
        Xof128Reader { reader: self.state.finalize_xof() }
    }
}

impl Xof128Reader {
    pub(crate) fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }
}

/// SHAKE256 in the absorbing phase.
pub(crate) struct Xof256 {
    state: Shake256,
}

/// SHAKE256 in the squeezing phase.
pub(crate) struct Xof256Reader {
    reader: Shake256Reader,
}

impl Xof256 {
    pub(crate) fn init() -> Self {
        Self { state: Shake256::default() }
    }

    pub(crate) fn absorb(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    pub(crate) fn finalize(self) -> Xof256Reader {
        Xof256Reader { reader: self.state.finalize_xof() }
    }
}

impl Xof256Reader {
    pub(crate) fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }
}

/// SHAKE128 stream keyed with `seed || le16(nonce)`, ready for squeezing.
pub(crate) fn shake128_stream(seed: &[u8], nonce: u16) -> Xof128Reader {
    let mut xof = Xof128::init();
    xof.absorb(seed);
    xof.absorb(&nonce.to_le_bytes());
    xof.finalize()
}

/// SHAKE256 stream keyed with `seed || le16(nonce)`, ready for squeezing.
pub(crate) fn shake256_stream(seed: &[u8], nonce: u16) -> Xof256Reader {
    let mut xof = Xof256::init();
    xof.absorb(seed);
    xof.absorb(&nonce.to_le_bytes());
    xof.finalize()
}

/// One-shot SHAKE256 over the concatenation of `parts`.
pub(crate) fn shake256_once(out: &mut [u8], parts: &[&[u8]]) {
    let mut xof = Xof256::init();
    for part in parts {
        xof.absorb(part);
    }
    xof.finalize().squeeze(out);
}
