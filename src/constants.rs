// Input columns expected from the series provider
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "open",
    "high",
    "low",
    "close",
    "adjusted_close",
    "volume",
];

// Preprocessing
pub const SMOOTHING_WINDOW: usize = 20; // Trailing moving-average window
pub const WINDOW_SIZE: usize = 30; // Time steps per window sample
pub const TRAIN_SPLIT_RATIO: f64 = 0.8; // Chronological train/validation split

// Model parameters
pub const HIDDEN_SIZE: usize = 120;
pub const NUM_LAYERS: usize = 3;
pub const DROPOUT_PROB: f64 = 0.2;

// Training
pub const EPOCHS: usize = 10;
pub const BATCH_SIZE: usize = 32;
pub const LEARNING_RATE: f64 = 1e-3;
