mod common;

use cipherdoc_mapper::{EntityCodec, MapperConfig, ProviderRegistry};
use common::{CountingRegistry, Person, Reading, Status, cipher, sample_person};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 50;

#[test]
fn shared_codec_encodes_and_decodes_in_parallel() {
    let codec = EntityCodec::<Person>::new(MapperConfig::builder().cipher(cipher(4)).build());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let codec = &codec;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let person = Person {
                        age: (t * ROUNDS + round) as i32,
                        pin: Some(round as i32),
                        status: Some(if round % 2 == 0 { Status::Active } else { Status::Archived }),
                        ..sample_person()
                    };
                    let doc = codec.encode(&person).unwrap();
                    assert_eq!(codec.decode_document(&doc).unwrap(), person);
                }
            });
        }
    });
}

#[test]
fn concurrent_misses_are_cached_once_per_key() {
    let registry = Arc::new(CountingRegistry::new(ProviderRegistry::with_defaults()));
    let codec = EntityCodec::<Reading>::new(
        MapperConfig::builder().shared_registry(registry.clone()).build(),
    );

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let codec = &codec;
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    assert!(codec.encode(&Reading::default()).is_err());
                }
            });
        }
    });

    assert_eq!(codec.cached_misses(), 1);
    // Threads racing on the first miss may each ask once.
    assert!(registry.lookups(common::CELSIUS) <= THREADS);
}

#[test]
fn codec_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EntityCodec<Person>>();
    assert_send_sync::<MapperConfig>();
}
