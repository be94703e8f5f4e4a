use afl::fuzz;
use dd_iban::{normalize, parse, Iban};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(i) = input.iter().position(|b| *b == b',') {
        Some((&input[0..i], &input[i + 1..]))
    } else {
        None
    }
}

fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    let (input, rand_seed) = split_bytes_once(bytes)?;
    let input_str = std::str::from_utf8(input).ok()?;

    let mut rng_seed: u64 = 0;
    for byte in rand_seed.iter().take(8) {
        rng_seed <<= 8;
        rng_seed += *byte as u64;
    }

    let rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(input_str, rng);

    Some(())
}

/// Re-spells the IBAN with random whitespace and lowercase letters.
fn respell(iban: &Iban, rng: &mut StdRng) -> String {
    let mut result = String::new();
    for c in iban.machine_form().chars() {
        if rng.gen_bool(0.25) {
            result.push([' ', '\t', '\n', '\u{a0}'][rng.gen_range(0..4)]);
        }
        if rng.gen_bool(0.5) {
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

fn run_fuzz(input: &str, mut rng: StdRng) {
    #[cfg(feature = "manual_test")]
    {
        println!("Input: {:?}", input);
        println!("Normalized: {:?}", normalize(input));
    }

    match parse(input) {
        Ok(iban) => {
            #[cfg(feature = "manual_test")]
            {
                println!("IBAN: {:#}", iban);
                println!("Validity: {:?}", iban.validity());
            }
            assert_eq!(parse(&normalize(input)).as_ref(), Ok(&iban));
            assert_eq!(parse(&iban.machine_form()).as_ref(), Ok(&iban));
            assert_eq!(iban.human_readable().replace(' ', ""), iban.machine_form());
            assert_eq!(parse(&respell(&iban, &mut rng)).as_ref(), Ok(&iban));
            assert_eq!(iban.validity(), iban.validity());
        }
        Err(err) => {
            #[cfg(feature = "manual_test")]
            println!("Error: {}", err);
            assert_eq!(err.input(), input);
            assert!(parse(&normalize(input)).is_err());
        }
    }
}
