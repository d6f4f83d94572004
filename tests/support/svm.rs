//! A reference stack machine for running generated assembly in tests.
//!
//! Memory is one array of `memory_size` words. The stack grows down from
//! the top, the heap grows up from address 0.

use std::collections::HashMap;

use fool::compiler::{Assembly, Instruction, Label};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    StackUnderflow,
    /// Stack and heap met.
    OutOfMemory,
    BadAddress(i32),
    UnknownLabel(Label),
    DivisionByZero,
    /// Ran past the last instruction without `halt`.
    NoHalt,
    StepLimit,
}

pub struct StackVm {
    code: Vec<Instruction>,
    targets: HashMap<Label, usize>,
    memory: Vec<i32>,
    ip: usize,
    sp: i32,
    fp: i32,
    hp: i32,
    ra: i32,
    tm: i32,
    steps: usize,
    step_limit: usize,
    output: Vec<i32>,
}

impl StackVm {
    pub fn new(assembly: &Assembly, memory_size: i32) -> Self {
        let code = assembly.instructions().to_vec();
        let targets = code
            .iter()
            .enumerate()
            .filter_map(|(index, instruction)| match instruction {
                Instruction::Label(label) => Some((*label, index)),
                _ => None,
            })
            .collect();
        Self {
            code,
            targets,
            memory: vec![0; memory_size as usize],
            ip: 0,
            sp: memory_size,
            fp: memory_size,
            hp: 0,
            ra: 0,
            tm: 0,
            steps: 0,
            step_limit: 1_000_000,
            output: Vec::new(),
        }
    }

    /// Run until `halt`, returning everything printed.
    pub fn run(mut self) -> Result<Vec<i32>, VmError> {
        loop {
            if self.steps == self.step_limit {
                return Err(VmError::StepLimit);
            }
            self.steps += 1;

            let instruction = *self.code.get(self.ip).ok_or(VmError::NoHalt)?;
            self.ip += 1;

            match instruction {
                Instruction::Push(value) => self.push(value)?,
                Instruction::PushLabel(label) => {
                    let address = self.target(label)?;
                    self.push(address as i32)?;
                }
                Instruction::Pop => {
                    self.pop()?;
                }
                Instruction::Add => self.binary(|v2, v1| Ok(v2.wrapping_add(v1)))?,
                Instruction::Sub => self.binary(|v2, v1| Ok(v2.wrapping_sub(v1)))?,
                Instruction::Mult => self.binary(|v2, v1| Ok(v2.wrapping_mul(v1)))?,
                Instruction::Div => self.binary(|v2, v1| {
                    v2.checked_div(v1).ok_or(VmError::DivisionByZero)
                })?,
                Instruction::Branch(label) => self.ip = self.target(label)?,
                Instruction::BranchEq(label) => {
                    let (v1, v2) = (self.pop()?, self.pop()?);
                    if v2 == v1 {
                        self.ip = self.target(label)?;
                    }
                }
                Instruction::BranchLessEq(label) => {
                    let (v1, v2) = (self.pop()?, self.pop()?);
                    if v2 <= v1 {
                        self.ip = self.target(label)?;
                    }
                }
                Instruction::JumpSubroutine => {
                    let address = self.pop()?;
                    self.ra = self.ip as i32;
                    self.ip = usize::try_from(address).map_err(|_| VmError::BadAddress(address))?;
                }
                Instruction::Print => {
                    let top = self.read(self.sp)?;
                    self.output.push(top);
                }
                Instruction::Halt => return Ok(self.output),
                Instruction::LoadWord => {
                    let address = self.pop()?;
                    let value = self.read(address)?;
                    self.push(value)?;
                }
                Instruction::StoreWord => {
                    let address = self.pop()?;
                    let value = self.pop()?;
                    self.write(address, value)?;
                }
                Instruction::LoadFp => self.push(self.fp)?,
                Instruction::StoreFp => self.fp = self.pop()?,
                Instruction::CopyFp => self.fp = self.sp,
                Instruction::LoadRa => self.push(self.ra)?,
                Instruction::StoreRa => self.ra = self.pop()?,
                Instruction::LoadTm => self.push(self.tm)?,
                Instruction::StoreTm => self.tm = self.pop()?,
                Instruction::LoadHp => self.push(self.hp)?,
                Instruction::StoreHp => self.hp = self.pop()?,
                Instruction::Label(_) => {}
            }
        }
    }

    fn target(&self, label: Label) -> Result<usize, VmError> {
        self.targets
            .get(&label)
            .copied()
            .ok_or(VmError::UnknownLabel(label))
    }

    fn push(&mut self, value: i32) -> Result<(), VmError> {
        if self.sp <= self.hp {
            return Err(VmError::OutOfMemory);
        }
        self.sp -= 1;
        self.write(self.sp, value)
    }

    fn pop(&mut self) -> Result<i32, VmError> {
        if self.sp as usize >= self.memory.len() {
            return Err(VmError::StackUnderflow);
        }
        let value = self.read(self.sp)?;
        self.sp += 1;
        Ok(value)
    }

    fn binary(&mut self, op: impl Fn(i32, i32) -> Result<i32, VmError>) -> Result<(), VmError> {
        let v1 = self.pop()?;
        let v2 = self.pop()?;
        self.push(op(v2, v1)?)
    }

    fn read(&self, address: i32) -> Result<i32, VmError> {
        usize::try_from(address)
            .ok()
            .and_then(|index| self.memory.get(index))
            .copied()
            .ok_or(VmError::BadAddress(address))
    }

    fn write(&mut self, address: i32, value: i32) -> Result<(), VmError> {
        let cell = usize::try_from(address)
            .ok()
            .and_then(|index| self.memory.get_mut(index))
            .ok_or(VmError::BadAddress(address))?;
        *cell = value;
        Ok(())
    }
}
