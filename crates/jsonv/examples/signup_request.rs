//! Validates a sign-up request read from stdin and prints either the decoded
//! value or every problem found, one per line.
//!
//! ```bash
//! echo '{"user": "ada", "email": "ada@example", "age": 12, "interests": []}' \
//!     | cargo run -p jsonv --example signup_request
//! ```

use std::{io, process::ExitCode};

use jsonv::{
    Error, ValidatingParser, boolean, enumeration, integer, object, prop, slice, string,
    validators::{max_len, min, min_len, pattern},
};

#[derive(Debug, Default)]
struct Signup {
    user: String,
    email: String,
    age: u8,
    plan: String,
    interests: Vec<String>,
    newsletter: bool,
}

jsonv::target_struct!(Signup { user, email, age, plan, interests, newsletter });

fn main() -> ExitCode {
    let plans = ["free", "pro", "team"].map(String::from);
    let parser = ValidatingParser::<Signup>::new(object([
        prop("user", string().validate(min_len(3)).validate(max_len(32))),
        prop("email", string().validate(pattern(r"^[^@\s]+@[^@\s]+\.[a-z]+$"))),
        prop("age", integer().validate(min(13))),
        prop("plan", enumeration(string(), plans)).with_default("free".to_string()),
        prop("interests", slice(string().validate(min_len(1))).validate(min_len(1))),
        prop("newsletter", boolean()).with_default(false),
    ]));

    let mut signup = Signup::default();
    match parser.parse(io::stdin().lock(), &mut signup) {
        Ok(()) => {
            println!("{signup:#?}");
            ExitCode::SUCCESS
        }
        Err(Error::Invalid(errors)) => {
            for record in &errors {
                println!("{record}");
            }
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
