use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    comment_labeler::app::run_cli(std::env::args().skip(1))
}
