use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// Twenty-six 16-bit cells named `A` through `Z`. A cell reads as an
/// error until something has been stored in it.

#[derive(Debug, Default, Clone)]
pub struct Memory {
    cells: [Option<i16>; 26],
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    pub fn clear(&mut self) {
        self.cells = [None; 26];
    }

    pub fn fetch(&self, var_name: char) -> Result<i16> {
        match self.cells.get(Memory::index(var_name)?) {
            Some(Some(val)) => Ok(*val),
            _ => Err(error!(UninitializedVariable; "{}", var_name)),
        }
    }

    pub fn store(&mut self, var_name: char, value: i16) -> Result<()> {
        let index = Memory::index(var_name)?;
        self.cells[index] = Some(value);
        Ok(())
    }

    /// Initialized cells in name order.
    pub fn iter(&self) -> impl Iterator<Item = (char, i16)> + '_ {
        self.cells
            .iter()
            .zip('A'..='Z')
            .filter_map(|(cell, name)| cell.map(|val| (name, val)))
    }

    fn index(var_name: char) -> Result<usize> {
        if var_name.is_ascii_uppercase() {
            Ok(var_name as usize - 'A' as usize)
        } else {
            Err(error!(InvalidVariable; "{}", var_name))
        }
    }
}
