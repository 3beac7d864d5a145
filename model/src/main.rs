use std::io;

use log::info;
use model::{ModelProvider, RandProvider};
use ndarray::array;

fn main() -> io::Result<()> {
    env_logger::init();

    let provider = RandProvider::default();
    let net = provider.construct(&[3, 4, 2])?;
    info!(params = net.size(); "built network {:?}", net.architecture());

    let x = array![[1., 2., 3.], [4., 5., 6.]];
    let output = net.forward(x.view())?;
    println!("{output}");

    Ok(())
}
