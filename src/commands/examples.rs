use crate::page_range::page_range_examples;

pub fn run() {
    for example in page_range_examples() {
        println!("{}", example);
    }
}
