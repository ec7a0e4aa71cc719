use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::visited::Pair;

/// フィボナッチ数表 F_0..F_{n-1}（多倍長）
pub fn fibonacci_table(n: usize) -> Vec<BigUint> {
    let mut table = Vec::with_capacity(n);
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..n {
        let next = &a + &b;
        table.push(std::mem::replace(&mut a, std::mem::replace(&mut b, next)));
    }
    table
}

/// 種 (a, b) から始まる一般化フィボナッチ列の第 k 項（k ≥ 1）。
/// G_0 = a, G_1 = b, G_k = a·F_{k-1} + b·F_k
pub fn generalized_term(seed: Pair, k: usize, fib: &[BigUint]) -> BigUint {
    assert!(k >= 1 && k < fib.len(), "k={} out of table range", k);
    BigUint::from(seed.0) * &fib[k - 1] + BigUint::from(seed.1) * &fib[k]
}

/// 剰余を取らずに多倍長で計算したラン値 G_2..G_{len+1} mod M。
/// fib は少なくとも len + 2 項必要。
pub fn reference_values(seed: Pair, modulus: u32, len: usize, fib: &[BigUint]) -> Vec<u32> {
    let m = BigUint::from(modulus);
    (2..len + 2)
        .map(|k| {
            (generalized_term(seed, k, fib) % &m)
                .to_u32()
                .unwrap_or(u32::MAX)
        })
        .collect()
}

/// ピサノ周期 π(M): (0, 1) が再び現れるまでのステップ数
pub fn pisano_period(modulus: u32) -> u64 {
    assert!(modulus > 0, "modulus must be positive");
    if modulus == 1 {
        return 1;
    }
    let m = modulus as u64;
    let (mut a, mut b) = (0u64, 1u64);
    let mut period = 0u64;
    loop {
        let next = (a + b) % m;
        a = b;
        b = next;
        period += 1;
        if a == 0 && b == 1 {
            return period;
        }
    }
}
