use ckks::ciphertext::Ciphertext;
use ckks::decryptor::Decryptor;
use ckks::encoding::Encoder;
use ckks::encryptor::Encryptor;
use ckks::evaluator::Evaluator;
use ckks::key_generator::KeyGenerator;
use ckks::keys::{EvalMultKey, KeyPair, ReEncryptionKey, RotationKeySet, SecretKey};
use ckks::parameters::Parameters;
use ckks::plaintext::Plaintext;
use ckks::reencryption::ReEncryptor;

/// Four parties: ciphertexts under key 1 are delegated to key 2, and
/// ciphertexts under keys a and b travel a -> 1 -> 2 -> a.
fn main() -> ckks::Result<()> {
    // Select verbosity with e.g. `RUST_LOG=ckks=debug`.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .without_time()
        .init();

    let batch_size: usize = 4;
    let params: Parameters = Parameters::build(6, 50, batch_size)?;
    println!("CKKS scheme is using ring dimension {}\n", params.n());

    let encoder: Encoder = Encoder::new(&params);
    let mut kgen: KeyGenerator = KeyGenerator::new(&params)?;
    let mut encryptor: Encryptor = Encryptor::new(&params)?;
    let decryptor: Decryptor = Decryptor::new(&params);
    let evaluator: Evaluator = Evaluator::new(&params)?;
    let reencryptor: ReEncryptor = ReEncryptor::new(&params)?;

    let keys_1: KeyPair = kgen.gen_key_pair();
    let keys_2: KeyPair = kgen.gen_key_pair();
    let keys_a: KeyPair = kgen.gen_key_pair();
    let keys_b: KeyPair = kgen.gen_key_pair();

    let rk_1_to_2: ReEncryptionKey = kgen.gen_reencryption_key(&keys_1.secret_key, &keys_2.public_key)?;
    let rk_a_to_1: ReEncryptionKey = kgen.gen_reencryption_key(&keys_a.secret_key, &keys_1.public_key)?;
    let rk_b_to_1: ReEncryptionKey = kgen.gen_reencryption_key(&keys_b.secret_key, &keys_1.public_key)?;
    let rk_2_to_a: ReEncryptionKey = kgen.gen_reencryption_key(&keys_2.secret_key, &keys_a.public_key)?;

    let evk_1: EvalMultKey = kgen.gen_eval_mult_key(&keys_1.secret_key)?;
    let rot_1: RotationKeySet = kgen.gen_rotation_keys(&keys_1.secret_key, &[1, -2])?;

    let x1: Vec<f64> = vec![1.1, 2.2, 3.3, 4.0];
    let x2: Vec<f64> = vec![5.5, 4.4, 3.2, 4.0];
    let x3: Vec<f64> = vec![2.0, 2.1, 2.2, 2.3];
    let x4: Vec<f64> = vec![3.0, 3.1, 3.2, 3.3];

    let pt1: Plaintext = encoder.encode(&x1)?;
    let pt2: Plaintext = encoder.encode(&x2)?;
    let pt3: Plaintext = encoder.encode(&x3)?;
    let pt4: Plaintext = encoder.encode(&x4)?;

    println!("Input x1: {:?}", x1);
    println!("Input x2: {:?}", x2);
    println!("Input x3: {:?}", x3);
    println!("Input x4: {:?}", x4);

    let c1: Ciphertext = encryptor.encrypt(&keys_1.public_key, &pt1);
    let c2: Ciphertext = encryptor.encrypt(&keys_1.public_key, &pt2);
    let c3: Ciphertext = encryptor.encrypt(&keys_a.public_key, &pt3);
    let c4: Ciphertext = encryptor.encrypt(&keys_b.public_key, &pt4);

    let c1_2: Ciphertext = reencryptor.reencrypt(&c1, &rk_1_to_2)?;
    let c3_1: Ciphertext = reencryptor.reencrypt(&c3, &rk_a_to_1)?;
    let c4_1: Ciphertext = reencryptor.reencrypt(&c4, &rk_b_to_1)?;

    let c_add: Ciphertext = evaluator.add(&c1, &c2)?;
    let c_sub: Ciphertext = evaluator.sub(&c1, &c2)?;
    let c_scalar: Ciphertext = evaluator.mul_scalar(&c1, 4.0)?;
    let c_mul: Ciphertext = evaluator.mul(&c1, &c2, &evk_1)?;
    let c_rot_1: Ciphertext = evaluator.rotate(&c1, 1, &rot_1)?;
    let c_rot_2: Ciphertext = evaluator.rotate(&c1, -2, &rot_1)?;

    let show = |label: &str, sk: &SecretKey, ct: &Ciphertext| {
        let pt: Plaintext = decryptor.decrypt(sk, ct);
        let values: Vec<String> = encoder
            .decode(&pt, batch_size)
            .iter()
            .map(|v| format!("{:.8}", v))
            .collect();
        println!(
            "{} = [{}] (level={}, ~{:.1} bits of precision)",
            label,
            values.join(", "),
            ct.level(),
            ct.estimated_precision_bits()
        );
    };

    println!("\nResults of homomorphic computations:");
    show("x1", &keys_1.secret_key, &c1);
    show("x1 + x2", &keys_1.secret_key, &c_add);
    show("x1 - x2", &keys_1.secret_key, &c_sub);
    show("4 * x1", &keys_1.secret_key, &c_scalar);
    show("x1 * x2", &keys_1.secret_key, &c_mul);
    show("x1 <<< 1", &keys_1.secret_key, &c_rot_1);
    show("x1 >>> 2", &keys_1.secret_key, &c_rot_2);

    println!("\nDelegated to key 2:");
    show("ReEncrypt(x1)", &keys_2.secret_key, &c1_2);
    for (label, ct) in [
        ("ReEncrypt(x1 + x2)", &c_add),
        ("ReEncrypt(x1 - x2)", &c_sub),
        ("ReEncrypt(4 * x1)", &c_scalar),
        ("ReEncrypt(x1 * x2)", &c_mul),
    ] {
        show(label, &keys_2.secret_key, &reencryptor.reencrypt(ct, &rk_1_to_2)?);
    }

    println!("\nMulti-hop a, b -> 1 -> 2 -> a:");
    let c_add_1: Ciphertext = evaluator.add(&c3_1, &c4_1)?;
    show("Re(x3) + Re(x4)", &keys_1.secret_key, &c_add_1);
    let c_add_2: Ciphertext = reencryptor.reencrypt(&c_add_1, &rk_1_to_2)?;
    show("ReRe(x3 + x4)", &keys_2.secret_key, &c_add_2);
    let c_add_a: Ciphertext = reencryptor.reencrypt(&c_add_2, &rk_2_to_a)?;
    show("ReReRe(x3 + x4)", &keys_a.secret_key, &c_add_a);

    Ok(())
}
