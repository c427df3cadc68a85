use clap::Parser;
use log::info;
use mnist_classifier::model::neural_net::NeuralNet;
use mnist_classifier::model::Model;
use mnist_classifier::parsing::mnist;
use std::error::Error;
use std::process;

const TRAIN_COUNT: u32 = 60000;
const TEST_COUNT: u32 = 10000;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The path of the training image record file
    #[arg(long, default_value = "data/training.idx3-ubyte")]
    train_images_path: String,

    /// The path of the training label record file
    #[arg(long, default_value = "data/training-labels.idx1-ubyte")]
    train_labels_path: String,

    /// The path of the test image record file
    #[arg(long, default_value = "data/testing.idx3-ubyte")]
    test_images_path: String,

    /// The path of the test label record file
    #[arg(long, default_value = "data/testing-labels.idx1-ubyte")]
    test_labels_path: String,

    /// Number of epochs to train the network for
    #[arg(short, long, default_value_t = 3)]
    epochs: usize,

    /// Learning rate of the network
    #[arg(short, long, default_value_t = 0.01)]
    learning_rate: f64,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let train = mnist::load_dataset(
        &args.train_images_path,
        &args.train_labels_path,
        TRAIN_COUNT,
    )?;
    let test = mnist::load_dataset(&args.test_images_path, &args.test_labels_path, TEST_COUNT)?;
    info!(
        "loaded {} training and {} test samples",
        train.len(),
        test.len()
    );

    let mut network = NeuralNet::new(args.learning_rate);
    network.fit(&train, args.epochs)?;

    let num_mistakes = network.mistakes(&test)?;
    let accuracy = 100.0 * (test.len() - num_mistakes) as f64 / test.len() as f64;
    println!(
        "The number of mistakes is {} ({:.2}% accuracy)",
        num_mistakes, accuracy
    );

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
