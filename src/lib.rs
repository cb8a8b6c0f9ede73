pub mod cache;
pub mod constants;
pub mod error;
pub mod forecaster;
pub mod progress;
pub mod additive {
    pub mod step_1_decomposition;
    pub mod step_2_projection;
}
pub mod lstm {
    pub mod step_1_data_preparation;
    pub mod step_2_lstm_cell;
    pub mod step_3_lstm_model_arch;
    pub mod step_4_train_model;
    pub mod step_5_prediction;
}
pub mod util {
    pub mod file_utils;
    pub mod pre_processor;
}
