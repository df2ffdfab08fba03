#[cfg(test)]
pub mod common;





#[cfg(test)]
mod test_moves;


#[cfg(test)]
mod test_move_processor;
