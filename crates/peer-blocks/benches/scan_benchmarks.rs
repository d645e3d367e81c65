use criterion::{Criterion, black_box, criterion_group, criterion_main};
use peer_blocks::{ClientIdentity, list_fields, remove_block, scan};

fn server_config(peers: usize) -> String {
    let mut config = String::from("[Interface]\nPrivateKey = c2VydmVy\nListenPort = 51820\n");
    for index in 0..peers {
        config.push_str(&format!(
            "\n[Peer]\nPublicKey = key{index}=\nAllowedIPs = 10.0.{}.{}/32\n# Client: client{index}\n",
            index / 250,
            index % 250 + 2
        ));
    }
    config
}

fn scan_benchmark(c: &mut Criterion) {
    let config = server_config(1_000);

    c.bench_function("scanner::scan (1000 peers)", |b| {
        b.iter(|| scan(black_box(&config)))
    });

    c.bench_function("editor::list_fields (1000 peers)", |b| {
        b.iter(|| list_fields(black_box(&config)))
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let config = server_config(1_000);

    // Worst case: the name is never found, so every block is probed twice.
    c.bench_function("editor::remove_block (key fallback, last peer)", |b| {
        let identity = ClientIdentity::new("missing").with_public_key("key999=");
        b.iter(|| remove_block(black_box(&config), black_box(&identity)).unwrap())
    });
}

criterion_group!(benches, scan_benchmark, remove_benchmark);
criterion_main!(benches);
