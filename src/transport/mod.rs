pub mod centrifugo;
