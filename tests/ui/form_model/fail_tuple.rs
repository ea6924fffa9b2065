#![allow(dead_code)]

use calmform::form::FormModel;

#[derive(FormModel)]
struct Credentials(String, String);

fn main() {}
