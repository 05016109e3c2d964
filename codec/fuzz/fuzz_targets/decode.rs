#![no_main]

use actor_params::{
    cbor, proof, Address, CidParams, CreateMinerParams, DecodeExt, Encode, EncodeSize,
};
use arbitrary::Arbitrary;
use bytes::Bytes;
use cid::{multihash::Multihash, Cid};
use libfuzzer_sys::fuzz_target;

const MAX_FUZZ_BYTES: usize = 4096;
const MAX_FUZZ_MULTIADDRS: usize = 64;

fn decode_raw(data: &[u8]) {
    // Decoding arbitrary bytes may fail, but must never panic.
    let _ = CidParams::decode(data);
    let _ = Option::<CidParams>::decode(data);
    let _ = CreateMinerParams::decode(data);
    let _ = cbor::validate(data);
}

fn roundtrip_cid_record(digest: [u8; 32], codec: u8) {
    let hash = Multihash::<64>::wrap(0x12, &digest).expect("digest fits");
    let params = CidParams::new(Cid::new_v1(codec as u64, hash));

    let encoded = params.encode();
    assert_eq!(encoded.len(), params.encode_size());

    let decoded = CidParams::decode(encoded).expect("failed to decode encoded record");
    assert_eq!(params, decoded);
}

fn roundtrip_create_miner(
    owner: u64,
    worker: u64,
    window_post_proof_type: i64,
    mut peer: Vec<u8>,
    mut multiaddrs: Vec<Vec<u8>>,
) {
    // Keep lengths within the codec's limits; the limits themselves are
    // exercised by `decode_raw`.
    peer.truncate(MAX_FUZZ_BYTES);
    multiaddrs.truncate(MAX_FUZZ_MULTIADDRS);
    let params = CreateMinerParams {
        owner: Address::new_id(owner),
        worker: Address::new_id(worker),
        window_post_proof_type,
        peer: Bytes::from(peer),
        multiaddrs: multiaddrs
            .into_iter()
            .map(|mut multiaddr| {
                multiaddr.truncate(MAX_FUZZ_BYTES);
                Bytes::from(multiaddr)
            })
            .collect(),
    };

    let encoded = params.encode();
    assert_eq!(encoded.len(), params.encode_size());

    let decoded = CreateMinerParams::decode(encoded).expect("failed to decode encoded params");
    assert_eq!(params, decoded);
}

fn absent_record() {
    let none: Option<CidParams> = None;
    let encoded = none.encode();
    assert_eq!(&encoded[..], &[0xf6]);
    assert_eq!(Option::<CidParams>::decode(encoded).unwrap(), None);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Raw(&'a [u8]),
    CidRecord {
        digest: [u8; 32],
        codec: u8,
    },
    CreateMiner {
        owner: u64,
        worker: u64,
        proof_offset: u8,
        peer: Vec<u8>,
        multiaddrs: Vec<Vec<u8>>,
    },
    AbsentRecord,
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Raw(data) => decode_raw(data),
        FuzzInput::CidRecord { digest, codec } => roundtrip_cid_record(digest, codec),
        FuzzInput::CreateMiner {
            owner,
            worker,
            proof_offset,
            peer,
            multiaddrs,
        } => roundtrip_create_miner(
            owner,
            worker,
            proof::STACKED_DRG_WINDOW_2KIB_V1 + (proof_offset % 5) as i64,
            peer,
            multiaddrs,
        ),
        FuzzInput::AbsentRecord => absent_record(),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
