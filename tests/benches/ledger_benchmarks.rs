//! # Invoice-Ledger Benchmarks
//!
//! | Area | Operation | Scaling |
//! |------|-----------|---------|
//! | Block | `push_transaction` onto a growing block | O(n) copy |
//! | Data access | `persist_transaction` (in-memory) | O(1) + signing |
//! | Channel | `decrypt_and_clean_channel` clear / encrypted | O(n) sequential |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use il_01_data_access::{
    Block, ConfirmedTransaction, DataAccessApi, DataAccessService, InMemoryStorage, Transaction,
    TransactionContent,
};
use il_02_transaction_manager::{
    ChannelParser, EthereumPrivateKeyDecryptionProvider, TransactionsFactory, TransactionsParser,
};
use serde_json::json;
use shared_crypto::{normalize_value_hash, Secp256k1KeyPair};
use shared_types::{EncryptionParameters, SignatureParameters};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const SIGNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const RECIPIENT_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

fn signer() -> SignatureParameters {
    SignatureParameters::ecdsa(SIGNER_KEY)
}

fn confirmed(content: TransactionContent, timestamp: u64) -> ConfirmedTransaction {
    ConfirmedTransaction {
        transaction: Arc::new(Transaction::create(content, &signer()).unwrap()),
        timestamp,
    }
}

// ============================================================================
// Block
// ============================================================================

fn bench_block_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("block");

    for size in [10usize, 100, 1_000] {
        let mut block = Block::empty();
        for i in 0..size {
            let tx = Transaction::create(TransactionContent::clear(json!({"i": i})), &signer())
                .unwrap();
            block
                .append_transaction(tx, &[format!("0x{:04x}", i % 16)])
                .unwrap();
        }
        let extra = Arc::new(
            Transaction::create(TransactionContent::clear(json!({"extra": true})), &signer())
                .unwrap(),
        );
        let topics = vec!["0xaaaa".to_string()];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("push_transaction", size), &block, |b, block| {
            b.iter(|| black_box(block.push_transaction(Arc::clone(&extra), &topics).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// Data access
// ============================================================================

fn bench_persist(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let service = DataAccessService::new(Arc::new(InMemoryStorage::new()));
    rt.block_on(service.initialize()).unwrap();

    let mut group = c.benchmark_group("data-access");
    group.measurement_time(Duration::from_secs(5));

    let mut counter = 0u64;
    group.bench_function("persist_transaction_in_memory", |b| {
        b.to_async(&rt).iter(|| {
            counter += 1;
            let content = TransactionContent::clear(json!({"n": counter}));
            let service = &service;
            async move {
                service
                    .persist_transaction(content, &signer(), &["0xbench".to_string()])
                    .await
                    .unwrap()
            }
        })
    });

    group.finish();
}

// ============================================================================
// Channel reconstruction
// ============================================================================

fn bench_channel_replay(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("channel");
    group.measurement_time(Duration::from_secs(10));

    let recipient_key = Secp256k1KeyPair::from_hex(RECIPIENT_KEY).unwrap();
    let provider = EthereumPrivateKeyDecryptionProvider::new();
    provider.add_decryption_parameters(RECIPIENT_KEY).unwrap();
    let encrypted_parser = ChannelParser::new(TransactionsParser::new(Some(Arc::new(provider))));
    let clear_parser = ChannelParser::default();

    for size in [10usize, 100] {
        let first = json!({"invoice": size});
        let channel_id = normalize_value_hash(&first);

        let clear_history: Vec<_> = std::iter::once(first.clone())
            .chain((1..size).map(|i| json!({"seq": i})))
            .enumerate()
            .map(|(i, payload)| confirmed(TransactionContent::clear(payload), i as u64))
            .collect();

        let (first_content, key) = TransactionsFactory::create_encrypted_transaction_in_new_channel(
            &first,
            &[EncryptionParameters::ecies(recipient_key.public_key_hex())],
        )
        .unwrap();
        let encrypted_history: Vec<_> = std::iter::once(confirmed(first_content, 0))
            .chain((1..size).map(|i| {
                let content =
                    TransactionsFactory::create_encrypted_transaction(&json!({"seq": i}), &key)
                        .unwrap();
                confirmed(content, i as u64)
            }))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("clear", size), &clear_history, |b, history| {
            b.to_async(&rt)
                .iter(|| clear_parser.decrypt_and_clean_channel(&channel_id, history))
        });
        group.bench_with_input(
            BenchmarkId::new("encrypted", size),
            &encrypted_history,
            |b, history| {
                b.to_async(&rt)
                    .iter(|| encrypted_parser.decrypt_and_clean_channel(&channel_id, history))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_block_push, bench_persist, bench_channel_replay);
criterion_main!(benches);
