mod arbitrary;
mod utils;
