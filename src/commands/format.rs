use crate::page_range::PageSet;

/// Print the compressed range string for `pages`, in any order
pub fn run(pages: &[u32]) {
    let set: PageSet = pages.iter().copied().collect();
    println!("{}", set);
}
