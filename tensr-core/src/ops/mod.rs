mod elementwise;
mod manipulate;
mod reduce;
