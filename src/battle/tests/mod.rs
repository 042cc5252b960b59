pub mod common;

#[cfg(test)]
mod test_fainting;
#[cfg(test)]
mod test_multi_hit;
#[cfg(test)]
mod test_special_moves;
#[cfg(test)]
mod test_switch;
