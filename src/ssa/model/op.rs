//! SSA opcodes.
//!
//! Machine-independent but width- and signedness-explicit: the opcode
//! selection tables pick exactly one of these per (operator, operand type)
//! pair, so every distinction the target cares about is already present in
//! the name.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Integer arithmetic, per exact width. Signedness does not matter for
    // these, so signed and unsigned operands share an opcode.
    Add8,
    Add16,
    Add32,
    Add64,
    Sub8,
    Sub16,
    Sub32,
    Sub64,
    Mul8,
    Mul16,
    Mul32,
    Mul64,

    // Float arithmetic.
    Add32F,
    Add64F,
    Sub32F,
    Sub64F,
    Mul32F,
    Mul64F,
    Div32F,
    Div64F,

    // Division and remainder distinguish signedness.
    Div8,
    Div8u,
    Div16,
    Div16u,
    Div32,
    Div32u,
    Div64,
    Div64u,
    Mod8,
    Mod8u,
    Mod16,
    Mod16u,
    Mod32,
    Mod32u,
    Mod64,
    Mod64u,

    // High-half multiply.
    Hmul8,
    Hmul8u,
    Hmul16,
    Hmul16u,
    Hmul32,
    Hmul32u,

    // Bitwise.
    And8,
    And16,
    And32,
    And64,
    Or8,
    Or16,
    Or32,
    Or64,
    Xor8,
    Xor16,
    Xor32,
    Xor64,

    // Unary.
    Neg8,
    Neg16,
    Neg32,
    Neg64,
    Neg32F,
    Neg64F,
    Com8,
    Com16,
    Com32,
    Com64,
    Not,
    Sqrt,

    // Shifts: value width x count width. Right shifts distinguish
    // signedness of the shifted value.
    Lsh8x8,
    Lsh8x16,
    Lsh8x32,
    Lsh8x64,
    Lsh16x8,
    Lsh16x16,
    Lsh16x32,
    Lsh16x64,
    Lsh32x8,
    Lsh32x16,
    Lsh32x32,
    Lsh32x64,
    Lsh64x8,
    Lsh64x16,
    Lsh64x32,
    Lsh64x64,
    Rsh8x8,
    Rsh8x16,
    Rsh8x32,
    Rsh8x64,
    Rsh16x8,
    Rsh16x16,
    Rsh16x32,
    Rsh16x64,
    Rsh32x8,
    Rsh32x16,
    Rsh32x32,
    Rsh32x64,
    Rsh64x8,
    Rsh64x16,
    Rsh64x32,
    Rsh64x64,
    Rsh8Ux8,
    Rsh8Ux16,
    Rsh8Ux32,
    Rsh8Ux64,
    Rsh16Ux8,
    Rsh16Ux16,
    Rsh16Ux32,
    Rsh16Ux64,
    Rsh32Ux8,
    Rsh32Ux16,
    Rsh32Ux32,
    Rsh32Ux64,
    Rsh64Ux8,
    Rsh64Ux16,
    Rsh64Ux32,
    Rsh64Ux64,

    // Left rotate, unsigned only.
    Lrot8,
    Lrot16,
    Lrot32,
    Lrot64,

    // Comparisons. Equality is sign-blind; ordering distinguishes it.
    Eq8,
    Eq16,
    Eq32,
    Eq64,
    EqPtr,
    Eq32F,
    Eq64F,
    Neq8,
    Neq16,
    Neq32,
    Neq64,
    NeqPtr,
    Neq32F,
    Neq64F,
    Less8,
    Less8U,
    Less16,
    Less16U,
    Less32,
    Less32U,
    Less64,
    Less64U,
    Less32F,
    Less64F,
    Leq8,
    Leq8U,
    Leq16,
    Leq16U,
    Leq32,
    Leq32U,
    Leq64,
    Leq64U,
    Leq32F,
    Leq64F,
    Greater8,
    Greater8U,
    Greater16,
    Greater16U,
    Greater32,
    Greater32U,
    Greater64,
    Greater64U,
    Greater32F,
    Greater64F,
    Geq8,
    Geq8U,
    Geq16,
    Geq16U,
    Geq32,
    Geq32U,
    Geq64,
    Geq64U,
    Geq32F,
    Geq64F,

    // Width changes.
    SignExt8to16,
    SignExt8to32,
    SignExt8to64,
    SignExt16to32,
    SignExt16to64,
    SignExt32to64,
    ZeroExt8to16,
    ZeroExt8to32,
    ZeroExt8to64,
    ZeroExt16to32,
    ZeroExt16to64,
    ZeroExt32to64,
    Trunc16to8,
    Trunc32to8,
    Trunc32to16,
    Trunc64to8,
    Trunc64to16,
    Trunc64to32,

    // Integer <-> float conversions.
    Cvt32to32F,
    Cvt32to64F,
    Cvt64to32F,
    Cvt64to64F,
    Cvt32Fto32,
    Cvt32Fto64,
    Cvt64Fto32,
    Cvt64Fto64,
    Cvt32Fto64F,
    Cvt64Fto32F,

    // Complex.
    ComplexMake,
    ComplexReal,
    ComplexImag,

    // Constants. Numeric payloads live in aux_int; strings in aux.
    ConstBool,
    Const8,
    Const16,
    Const32,
    Const64,
    Const32F,
    Const64F,
    ConstString,
    ConstNil,
    ConstInterface,
    ConstSlice,

    // Function prologue values.
    InitMem,
    SP,
    SB,
    /// By-value parameter read; aux names the parameter symbol.
    Arg,
    /// Placeholder read of a variable with no binding in the current block;
    /// resolved by the downstream renaming pass.
    FwdRef,

    // Memory thread.
    /// Marks a stack variable becoming live ahead of its first store.
    VarDef,
    Store,
    Zero,
    Load,

    // Addressing.
    Addr,
    OffPtr,
    AddPtr,
    PtrIndex,
    SliceLen,
    SlicePtr,

    // Runtime checks.
    IsInBounds,
    IsNonNil,
    PanicIndexCheck,
    PanicNilCheck,

    // Interface dissection.
    ITab,
    IData,

    // Calls.
    StaticCall,
    ClosureCall,
    InterCall,
    DeferCall,
    GoCall,

    Copy,
    /// Table marker: the conversion has no direct or two-step machine form
    /// and must be expanded into a compare/branch sequence by the caller.
    Invalid,
}
