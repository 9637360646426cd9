#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use sponsored_batch_core::Call;
use sponsored_batch_encoder::BatchSigner;
use sponsored_batch_sim::World;

pub const SPONSOR: Address = Address::repeat_byte(0x5a);
pub const X: Address = Address::repeat_byte(0x01);
pub const Y: Address = Address::repeat_byte(0x02);
pub const Z: Address = Address::repeat_byte(0x03);
pub const TOKEN: Address = Address::repeat_byte(0x70);

pub fn principal_key() -> BatchSigner {
    BatchSigner::from_slice(&[0x11; 32]).unwrap()
}

pub fn intruder_key() -> BatchSigner {
    BatchSigner::from_slice(&[0x22; 32]).unwrap()
}

pub fn wei(amount: u64) -> U256 {
    U256::from(amount)
}

/// World with an activated, funded principal, a funded sponsor and one token.
pub fn setup() -> (World, BatchSigner) {
    let key = principal_key();
    let mut world = World::new();
    world.activate(key.address());
    world.fund(key.address(), wei(100)).unwrap();
    world.fund(SPONSOR, wei(100)).unwrap();
    world.deploy_token(TOKEN);
    (world, key)
}

pub fn signed(key: &BatchSigner, nonce: U256, calls: &[Call]) -> Vec<u8> {
    key.sign_batch(nonce, calls).unwrap().to_bytes().to_vec()
}
