#![no_main]
use std::cell::RefCell;
use std::io::{self, Read};

use arbitrary::Arbitrary;
use jsonv::{
    Error, ParserOptions, ValidatingParser, integer, object, prop, scanner::Scanner, slice,
    string,
    validators::{max_len, min},
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte chunk seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    // Not JSON whitespace; must be rejected.
    "\u{00A0}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        let limit = max_size - prefix;
        prefix += append_value(&mut data[prefix..], size, limit);
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n = rng.random_range(1..=limit.min(4));
        let mut written = 0;
        for _ in 0..n {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Values biased towards the shape the fuzzed schema expects.
#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(12)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=5 => Value::String(u.arbitrary()?),
            6..=7 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            8..=9 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => {
                let mut m = Map::new();
                m.insert("name".into(), Value::String(u.arbitrary()?));
                m.insert("age".into(), Value::Number(u.arbitrary::<i64>()?.into()));
                let tags: Vec<String> = u.arbitrary()?;
                m.insert("tags".into(), tags.into());
                Value::Object(m)
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Hands out reads of pseudo-random sizes derived from `seed`.
struct SplitReader<'a> {
    data: &'a [u8],
    seed: u64,
}

impl Read for SplitReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let want = ((self.seed >> 33) % 17) as usize + 1;
        let n = want.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: i32,
    tags: Vec<String>,
    nick: Option<String>,
}

jsonv::target_struct!(Person { name, age, tags, nick });

fn person_parser(options: ParserOptions) -> ValidatingParser<Person> {
    ValidatingParser::new(object([
        prop("name", string()),
        prop("age", integer().validate(min(0))),
        prop("tags", slice(string()).validate(max_len(4))).with_default(Vec::<String>::new()),
        prop("nick", string()),
    ]))
    .with_options(options)
}

/// Outcome with the error reduced to something comparable.
fn outcome(result: Result<(), Error>) -> Result<(), String> {
    result.map_err(|e| match e {
        Error::Io(e) => panic!("in-memory reader failed: {e}"),
        other => other.to_string(),
    })
}

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    let options = ParserOptions {
        read_size: usize::from(flags & 0x1F) + 1,
        max_depth: 64,
        allow_trailing_data: flags & 0x20 != 0,
    };

    let mut scanner = Scanner::with_options(data, &options);
    let _ = scanner.skip_value().and_then(|()| scanner.finish());

    let mut whole = Person::default();
    let expected = outcome(person_parser(options).parse(data, &mut whole));

    let mut split = Person::default();
    let actual = outcome(person_parser(options).parse(SplitReader { data, seed }, &mut split));

    assert_eq!(expected, actual);
    assert_eq!(whole, split);
}

fuzz_target!(|data: &[u8]| run(data));
