use rand::{rngs::OsRng, RngCore};

pub const SEED_LEN: usize = 32;
pub type Seed = [u8; SEED_LEN];

/// Packs `input` into a seed: short inputs are right-aligned behind zero
/// bytes, long ones keep their first `SEED_LEN` bytes.
pub fn from_str(input: &str) -> Seed {
    let bytes = input.as_bytes();
    let mut seed = [0; SEED_LEN];
    if bytes.len() >= SEED_LEN {
        seed.copy_from_slice(&bytes[..SEED_LEN]);
    } else {
        seed[SEED_LEN - bytes.len()..].copy_from_slice(bytes);
    }
    seed
}

pub fn from_os() -> Result<Seed, rand::Error> {
    let mut seed = [0; SEED_LEN];
    OsRng.try_fill_bytes(&mut seed)?;
    Ok(seed)
}
