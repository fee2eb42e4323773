//! Node kinds and child field labels of the concrete syntax tree.

macro_rules! syntax_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Kind of a [`super::SyntaxNode`]. The printed names follow the
        /// `snake_case` production names used in tree dumps.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SyntaxKind {
            $($variant,)*
        }

        impl SyntaxKind {
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$variant,)*];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(SyntaxKind::$variant => $name,)*
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(SyntaxKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

syntax_kinds! {
    CompilationUnit => "compilation_unit",
    UsingDirective => "using_directive",
    AttributeList => "attribute_list",
    AttributeTargetSpecifier => "attribute_target_specifier",
    Attribute => "attribute",
    AttributeArgumentList => "attribute_argument_list",
    AttributeArgument => "attribute_argument",
    NamespaceDeclaration => "namespace_declaration",
    FileScopedNamespaceDeclaration => "file_scoped_namespace_declaration",
    ClassDeclaration => "class_declaration",
    StructDeclaration => "struct_declaration",
    InterfaceDeclaration => "interface_declaration",
    EnumDeclaration => "enum_declaration",
    EnumMemberDeclarationList => "enum_member_declaration_list",
    EnumMemberDeclaration => "enum_member_declaration",
    DelegateDeclaration => "delegate_declaration",
    Modifier => "modifier",
    TypeParameterList => "type_parameter_list",
    TypeParameter => "type_parameter",
    BaseList => "base_list",
    PrimaryConstructorBaseType => "primary_constructor_base_type",
    TypeParameterConstraintsClause => "type_parameter_constraints_clause",
    TypeParameterConstraint => "type_parameter_constraint",
    DeclarationList => "declaration_list",
    FieldDeclaration => "field_declaration",
    UsingFieldDeclaration => "using_field_declaration",
    MethodDeclaration => "method_declaration",
    MixinDeclaration => "mixin_declaration",
    ConstructorDeclaration => "constructor_declaration",
    ConstructorInitializer => "constructor_initializer",
    DestructorDeclaration => "destructor_declaration",
    PropertyDeclaration => "property_declaration",
    IndexerDeclaration => "indexer_declaration",
    AccessorList => "accessor_list",
    AccessorDeclaration => "accessor_declaration",
    OperatorDeclaration => "operator_declaration",
    ConversionOperatorDeclaration => "conversion_operator_declaration",
    OverloadableOperator => "overloadable_operator",
    ExplicitInterfaceSpecifier => "explicit_interface_specifier",
    ParameterList => "parameter_list",
    BracketedParameterList => "bracketed_parameter_list",
    Parameter => "parameter",
    ArgumentList => "argument_list",
    BracketedArgumentList => "bracketed_argument_list",
    Argument => "argument",
    TuplePattern => "tuple_pattern",
    Block => "block",
    ArrowExpressionClause => "arrow_expression_clause",
    VariableDeclaration => "variable_declaration",
    VariableDeclarator => "variable_declarator",

    Identifier => "identifier",
    QualifiedName => "qualified_name",
    AliasQualifiedName => "alias_qualified_name",
    GenericName => "generic_name",
    TypeArgumentList => "type_argument_list",
    PredefinedType => "predefined_type",
    ImplicitType => "implicit_type",
    ArrayType => "array_type",
    ArrayRankSpecifier => "array_rank_specifier",
    NullableType => "nullable_type",
    PointerType => "pointer_type",
    FunctionPointerType => "function_pointer_type",
    RefType => "ref_type",
    TupleType => "tuple_type",
    TupleElement => "tuple_element",

    BreakStatement => "break_statement",
    ContinueStatement => "continue_statement",
    DoStatement => "do_statement",
    RepeatWhileStatement => "repeat_while_statement",
    EmptyStatement => "empty_statement",
    ExpressionStatement => "expression_statement",
    ForStatement => "for_statement",
    ForeachStatement => "foreach_statement",
    ReturnStatement => "return_statement",
    SwitchStatement => "switch_statement",
    SwitchBody => "switch_body",
    SwitchSection => "switch_section",
    UsingStatement => "using_statement",
    LabeledStatement => "labeled_statement",
    IfStatement => "if_statement",
    WhileStatement => "while_statement",
    LocalDeclarationStatement => "local_declaration_statement",
    LocalFunctionStatement => "local_function_statement",
    DeferStatement => "defer_statement",
    DeleteStatement => "delete_statement",

    ConstantPattern => "constant_pattern",
    Discard => "discard",
    ParenthesizedPattern => "parenthesized_pattern",
    VarPattern => "var_pattern",
    TypePattern => "type_pattern",
    RecursivePattern => "recursive_pattern",
    PositionalPatternClause => "positional_pattern_clause",
    PropertyPatternClause => "property_pattern_clause",
    Subpattern => "subpattern",
    RelationalPattern => "relational_pattern",
    NegatedPattern => "negated_pattern",
    AndPattern => "and_pattern",
    OrPattern => "or_pattern",
    DeclarationPattern => "declaration_pattern",
    ParenthesizedVariableDesignation => "parenthesized_variable_designation",
    WhenClause => "when_clause",

    AssignmentExpression => "assignment_expression",
    BinaryExpression => "binary_expression",
    PrefixUnaryExpression => "prefix_unary_expression",
    PostfixUnaryExpression => "postfix_unary_expression",
    ConditionalExpression => "conditional_expression",
    ConditionalAccessExpression => "conditional_access_expression",
    MemberBindingExpression => "member_binding_expression",
    ElementBindingExpression => "element_binding_expression",
    AsExpression => "as_expression",
    IsExpression => "is_expression",
    IsPatternExpression => "is_pattern_expression",
    CastExpression => "cast_expression",
    CheckedExpression => "checked_expression",
    InvocationExpression => "invocation_expression",
    ElementAccessExpression => "element_access_expression",
    MemberAccessExpression => "member_access_expression",
    ObjectCreationExpression => "object_creation_expression",
    ArrayCreationExpression => "array_creation_expression",
    InitializerExpression => "initializer_expression",
    ParenthesizedExpression => "parenthesized_expression",
    TupleExpression => "tuple_expression",
    LambdaExpression => "lambda_expression",
    ImplicitParameter => "implicit_parameter",
    AnonymousMethodExpression => "anonymous_method_expression",
    DeclarationExpression => "declaration_expression",
    DefaultExpression => "default_expression",
    TypeOperatorExpression => "type_operator_expression",
    RangeExpression => "range_expression",
    SwitchExpression => "switch_expression",
    SwitchExpressionArm => "switch_expression_arm",
    WithExpression => "with_expression",
    InterpolatedStringExpression => "interpolated_string_expression",
    Interpolation => "interpolation",
    InterpolationAlignmentClause => "interpolation_alignment_clause",
    InterpolationFormatClause => "interpolation_format_clause",

    NullLiteral => "null_literal",
    BooleanLiteral => "boolean_literal",
    IntegerLiteral => "integer_literal",
    RealLiteral => "real_literal",
    CharacterLiteral => "character_literal",
    StringLiteral => "string_literal",
    VerbatimStringLiteral => "verbatim_string_literal",
    RawStringLiteral => "raw_string_literal",

    PreprocIf => "preproc_if",
    PreprocElif => "preproc_elif",
    PreprocElse => "preproc_else",
    UnaryExpression => "unary_expression",

    Error => "ERROR",
}

impl SyntaxKind {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == SyntaxKind::Error
    }

    #[must_use]
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::RepeatWhileStatement
                | SyntaxKind::EmptyStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForeachStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::SwitchStatement
                | SyntaxKind::UsingStatement
                | SyntaxKind::LabeledStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::LocalFunctionStatement
                | SyntaxKind::DeferStatement
                | SyntaxKind::DeleteStatement
        )
    }

    #[must_use]
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::DelegateDeclaration
        )
    }

    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NullLiteral
                | SyntaxKind::BooleanLiteral
                | SyntaxKind::IntegerLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::CharacterLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::VerbatimStringLiteral
                | SyntaxKind::RawStringLiteral
        )
    }

    #[must_use]
    pub fn is_preprocessor(self) -> bool {
        matches!(
            self,
            SyntaxKind::PreprocIf | SyntaxKind::PreprocElif | SyntaxKind::PreprocElse
        )
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Body,
    Type,
    Condition,
    Consequence,
    Alternative,
    Left,
    Right,
    Operator,
    Value,
    Parameters,
    TypeParameters,
    Returns,
    Arguments,
    Function,
    Expression,
    Subscript,
    Initializer,
    Update,
    Target,
    Accessors,
    Pattern,
    Alias,
    Qualifier,
    Rank,
    Content,
    Argument,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Body => "body",
            Field::Type => "type",
            Field::Condition => "condition",
            Field::Consequence => "consequence",
            Field::Alternative => "alternative",
            Field::Left => "left",
            Field::Right => "right",
            Field::Operator => "operator",
            Field::Value => "value",
            Field::Parameters => "parameters",
            Field::TypeParameters => "type_parameters",
            Field::Returns => "returns",
            Field::Arguments => "arguments",
            Field::Function => "function",
            Field::Expression => "expression",
            Field::Subscript => "subscript",
            Field::Initializer => "initializer",
            Field::Update => "update",
            Field::Target => "target",
            Field::Accessors => "accessors",
            Field::Pattern => "pattern",
            Field::Alias => "alias",
            Field::Qualifier => "qualifier",
            Field::Rank => "rank",
            Field::Content => "content",
            Field::Argument => "argument",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
