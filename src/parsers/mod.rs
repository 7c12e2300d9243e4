pub mod html;

#[cfg(test)]
mod tests;
