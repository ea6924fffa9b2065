#![allow(dead_code)]

use calmform::form::FormModel;

#[derive(FormModel)]
enum Plan {
    Free,
}

fn main() {}
