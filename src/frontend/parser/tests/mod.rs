mod fixtures;
mod grammar;
mod recovery;
