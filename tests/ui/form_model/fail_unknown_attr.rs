#![allow(dead_code)]

use calmform::form::FormModel;

#[derive(FormModel)]
struct Signup {
    #[form(bogus)]
    email: String,
}

fn main() {}
